// Importação de estoque via CSV.
//
// Colunas esperadas (cabeçalho, sem distinção de caixa): sku, prateleira,
// distribuidor, quantidade. Delimitador ";" ou "," detectado pelo conteúdo.
// Linhas que não resolvem produto, prateleira ou distribuidor pelo nome são
// puladas e contadas, nunca abortam a importação.

use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    common::error::AppError,
    db::{DistribuidorRepository, EstoqueRepository, PrateleiraRepository, ProdutoRepository},
};

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResumoImportacao {
    pub importados: u32,
    pub ignorados: u32,
}

#[derive(Clone)]
pub struct ImportacaoService {
    produto_repo: ProdutoRepository,
    prateleira_repo: PrateleiraRepository,
    distribuidor_repo: DistribuidorRepository,
    estoque_repo: EstoqueRepository,
}

impl ImportacaoService {
    pub fn new(
        produto_repo: ProdutoRepository,
        prateleira_repo: PrateleiraRepository,
        distribuidor_repo: DistribuidorRepository,
        estoque_repo: EstoqueRepository,
    ) -> Self {
        Self { produto_repo, prateleira_repo, distribuidor_repo, estoque_repo }
    }

    pub async fn importar_estoque_csv(&self, conteudo: &[u8]) -> Result<ResumoImportacao, AppError> {
        let delimitador = if conteudo.contains(&b';') { b';' } else { b',' };

        let mut leitor = csv::ReaderBuilder::new()
            .delimiter(delimitador)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(conteudo);

        // Normaliza o cabeçalho: minúsculas e sem espaços.
        let cabecalho: Vec<String> = leitor
            .headers()
            .map_err(|e| AppError::CsvInvalido(e.to_string()))?
            .iter()
            .map(|h| h.trim().to_lowercase().replace(' ', ""))
            .collect();

        let coluna = |nome: &str| cabecalho.iter().position(|c| c == nome);
        let col_sku = coluna("sku")
            .ok_or_else(|| AppError::CsvInvalido("coluna 'sku' ausente".to_string()))?;
        let col_prateleira = coluna("prateleira")
            .ok_or_else(|| AppError::CsvInvalido("coluna 'prateleira' ausente".to_string()))?;
        let col_distribuidor = coluna("distribuidor");
        let col_quantidade = coluna("quantidade")
            .ok_or_else(|| AppError::CsvInvalido("coluna 'quantidade' ausente".to_string()))?;

        let mut importados: u32 = 0;
        let mut ignorados: u32 = 0;

        for registro in leitor.records() {
            let registro = registro.map_err(|e| AppError::CsvInvalido(e.to_string()))?;

            let sku = registro.get(col_sku).unwrap_or_default();
            let prateleira_nome = registro.get(col_prateleira).unwrap_or_default();
            let distribuidor_nome = col_distribuidor
                .and_then(|c| registro.get(c))
                .unwrap_or_default();
            let quantidade: i32 = registro
                .get(col_quantidade)
                .unwrap_or_default()
                .parse()
                .unwrap_or(0);

            if sku.is_empty() || quantidade <= 0 {
                ignorados += 1;
                continue;
            }

            let Some(produto) = self.produto_repo.buscar_por_sku(sku).await? else {
                tracing::warn!(sku, "SKU não cadastrado, linha ignorada");
                ignorados += 1;
                continue;
            };
            let Some(prateleira) = self.prateleira_repo.buscar_por_nome(prateleira_nome).await?
            else {
                tracing::warn!(prateleira = prateleira_nome, "Prateleira não cadastrada, linha ignorada");
                ignorados += 1;
                continue;
            };
            let Some(distribuidor) =
                self.distribuidor_repo.buscar_por_nome(distribuidor_nome).await?
            else {
                tracing::warn!(
                    distribuidor = distribuidor_nome,
                    "Distribuidor não cadastrado, linha ignorada"
                );
                ignorados += 1;
                continue;
            };

            self.estoque_repo
                .criar_ou_somar(produto.id, prateleira.id, distribuidor.id, quantidade)
                .await?;
            importados += 1;
        }

        if importados == 0 {
            return Err(AppError::CsvInvalido("nenhum item válido para importar".to_string()));
        }

        Ok(ResumoImportacao { importados, ignorados })
    }
}
