// Geração do romaneio em PDF para impressão.

use genpdf::{elements, style, Alignment, Element};
use image::Luma;
use qrcode::QrCode;

use crate::{common::error::AppError, models::picking::SessaoSnapshot};

/// Monta o PDF do romaneio: cabeçalho com número e QR code, uma tabela por
/// prateleira na ordem da rota e os totais ao final.
pub fn gerar_pdf_romaneio(snapshot: &SessaoSnapshot) -> Result<Vec<u8>, AppError> {
    // Carrega a fonte da pasta 'fonts/'
    let font_family = genpdf::fonts::from_files("./fonts", "Roboto", None)
        .map_err(|_| AppError::FontNotFound("Fonte não encontrada na pasta ./fonts".to_string()))?;

    let mut doc = genpdf::Document::new(font_family);
    doc.set_title(format!("Romaneio {}", snapshot.romaneio.numero));
    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(10);
    doc.set_page_decorator(decorator);

    // --- CABEÇALHO ---
    doc.push(
        elements::Paragraph::new(format!("ROMANEIO #{}", snapshot.romaneio.numero))
            .styled(style::Style::new().bold().with_font_size(18)),
    );
    if !snapshot.romaneio.descricao.is_empty() {
        doc.push(
            elements::Paragraph::new(snapshot.romaneio.descricao.clone())
                .styled(style::Style::new().with_font_size(10)),
        );
    }
    doc.push(elements::Paragraph::new(format!(
        "Data: {}",
        snapshot.romaneio.created_at.format("%d/%m/%Y")
    )));

    // QR code com o número do romaneio, para conferência pelo coletor.
    let code = QrCode::new(snapshot.romaneio.numero.as_bytes())
        .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;
    let image_buffer = code.render::<Luma<u8>>().build();
    let dynamic_image = image::DynamicImage::ImageLuma8(image_buffer);
    let pdf_image = genpdf::elements::Image::from_dynamic_image(dynamic_image)
        .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?
        .with_scale(genpdf::Scale::new(0.5, 0.5));
    doc.push(pdf_image);

    doc.push(elements::Break::new(1.5));

    // --- AVISOS DE FALTA ---
    if !snapshot.avisos.is_empty() {
        doc.push(
            elements::Paragraph::new("ATENÇÃO: estoque insuficiente")
                .styled(style::Style::new().bold().with_font_size(12)),
        );
        for aviso in &snapshot.avisos {
            doc.push(elements::Paragraph::new(format!("- {aviso}")));
        }
        doc.push(elements::Break::new(1));
    }

    // --- ROTA, UMA TABELA POR PRATELEIRA ---
    let style_bold = style::Style::new().bold();
    for grupo in &snapshot.rota {
        doc.push(
            elements::Paragraph::new(format!("Prateleira: {}", grupo.prateleira))
                .styled(style::Style::new().bold().with_font_size(12)),
        );

        // Pesos das colunas: SKU (2), Produto (4), Caixas/Unidades (2), Status (2)
        let mut table = elements::TableLayout::new(vec![2, 4, 2, 2]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        table
            .row()
            .element(elements::Paragraph::new("SKU").styled(style_bold))
            .element(elements::Paragraph::new("Produto").styled(style_bold))
            .element(elements::Paragraph::new("Caixas (Unid.)").styled(style_bold))
            .element(elements::Paragraph::new("Status").styled(style_bold))
            .push()
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

        for item in &grupo.itens {
            let status = if item.insuficiente { "Insuficiente" } else { "" };
            table
                .row()
                .element(elements::Paragraph::new(item.produto_sku.clone()))
                .element(elements::Paragraph::new(item.produto_nome.clone()))
                .element(elements::Paragraph::new(format!("{} ({})", item.caixas, item.unidades)))
                .element(elements::Paragraph::new(status))
                .push()
                .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;
        }

        doc.push(table);
        doc.push(elements::Break::new(1));
    }

    // --- TOTAIS ---
    let total_caixas: i64 = snapshot.itens.iter().map(|i| i64::from(i.quantidade)).sum();
    let total_unidades: i64 = snapshot
        .itens
        .iter()
        .map(|i| i64::from(i.quantidade) * i64::from(i.unidades_por_caixa()))
        .sum();

    let mut totais = elements::Paragraph::new(format!(
        "Total de Caixas: {}   Total de Unidades: {}   Produtos Diferentes: {}",
        total_caixas,
        total_unidades,
        snapshot.itens.len()
    ));
    totais.set_alignment(Alignment::Right);
    doc.push(totais.styled(style::Style::new().bold().with_font_size(12)));

    // Renderiza para buffer em memória.
    let mut buffer = Vec::new();
    doc.render(&mut buffer)
        .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

    Ok(buffer)
}
