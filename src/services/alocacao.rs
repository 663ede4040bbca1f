// Motor de alocação do romaneio.
//
// Recebe os itens bipados e uma fotografia do estoque por produto, e produz
// as alocações por prateleira, os avisos de falta e a rota de separação.
// Cálculo puro: nenhuma E/S acontece aqui; buscar o estoque é problema de
// quem chama (uma consulta por produto distinto, não por linha).

use std::collections::HashMap;

use crate::models::estoque::EstoqueDisponivel;
use crate::models::picking::{Alocacao, GrupoRota, ItemBipado, ItemRota, ResultadoAlocacao};
use crate::services::rota;

struct Demanda {
    produto_nome: String,
    produto_sku: String,
    quantidade_caixa: i32,
    caixas: i64,
}

/// Calcula alocações, avisos de falta e rota para a lista de itens bipados.
///
/// Invariantes garantidas por produto:
/// - soma das unidades alocadas == min(unidades necessárias, total disponível);
/// - aviso de falta emitido se e somente se total disponível < necessário,
///   e nesse caso toda alocação do produto sai com `insuficiente = true`;
/// - caixas por alocação = teto(unidades / quantidade_caixa).
pub fn calcular_alocacoes(
    itens: &[ItemBipado],
    estoque_por_produto: &HashMap<i64, Vec<EstoqueDisponivel>>,
) -> ResultadoAlocacao {
    if itens.is_empty() {
        return ResultadoAlocacao::default();
    }

    // Agrega as caixas por produto, preservando a ordem da primeira bipagem.
    let mut ordem_produtos: Vec<i64> = Vec::new();
    let mut demanda: HashMap<i64, Demanda> = HashMap::new();
    for item in itens {
        let entrada = demanda.entry(item.produto_id).or_insert_with(|| {
            ordem_produtos.push(item.produto_id);
            Demanda {
                produto_nome: item.produto_nome.clone(),
                produto_sku: item.produto_sku.clone(),
                quantidade_caixa: item.unidades_por_caixa(),
                caixas: 0,
            }
        });
        entrada.caixas += i64::from(item.quantidade);
    }

    // Ordem de bipagem das prateleiras, usada como desempate de preferência.
    let mut ordem_bipagem: Vec<i64> = Vec::new();
    for item in itens {
        if !ordem_bipagem.contains(&item.prateleira_id) {
            ordem_bipagem.push(item.prateleira_id);
        }
    }

    // Falha de consulta (ou estoque vazio) para todos os produtos: agrupa
    // direto pelas prateleiras bipadas, sem fabricar avisos de falta.
    let sem_estoque = ordem_produtos
        .iter()
        .all(|id| estoque_por_produto.get(id).is_none_or(|e| e.is_empty()));
    if sem_estoque {
        return ResultadoAlocacao {
            alocacoes: HashMap::new(),
            rota: rota_das_bipagens(itens),
            avisos: Vec::new(),
        };
    }

    let mut alocacoes: HashMap<i64, Vec<Alocacao>> = HashMap::new();
    let mut avisos: Vec<String> = Vec::new();

    for produto_id in &ordem_produtos {
        let info = &demanda[produto_id];
        let unidades_caixa = i64::from(info.quantidade_caixa);
        let unidades_necessarias = info.caixas * unidades_caixa;

        let vazio = Vec::new();
        let entradas = estoque_por_produto.get(produto_id).unwrap_or(&vazio);
        let total_disponivel: i64 = entradas.iter().map(|e| i64::from(e.quantidade.max(0))).sum();

        let insuficiente = total_disponivel < unidades_necessarias;
        let mut do_produto: Vec<Alocacao> = Vec::new();

        if !insuficiente {
            // Preferência por satisfazer numa prateleira única.
            let mut candidatas: Vec<&EstoqueDisponivel> = entradas
                .iter()
                .filter(|e| i64::from(e.quantidade) >= unidades_necessarias)
                .collect();
            candidatas.sort_by(|a, b| rota::comparar_preferencia(a, b, &ordem_bipagem));

            if let Some(unica) = candidatas.first() {
                do_produto.push(nova_alocacao(unica, unidades_necessarias, unidades_caixa, false));
            } else {
                reparte_gulosa(
                    entradas,
                    unidades_necessarias,
                    unidades_caixa,
                    &ordem_bipagem,
                    false,
                    &mut do_produto,
                );
            }
        } else {
            let deficit = unidades_necessarias - total_disponivel;
            avisos.push(format!("{} (falta {} unidades)", info.produto_nome, deficit));
            reparte_gulosa(
                entradas,
                total_disponivel,
                unidades_caixa,
                &ordem_bipagem,
                true,
                &mut do_produto,
            );
        }

        if !do_produto.is_empty() {
            alocacoes.insert(*produto_id, do_produto);
        }
    }

    // Agrupa por prateleira e ordena os grupos pela rota em serpentina.
    let mut grupos: HashMap<i64, GrupoRota> = HashMap::new();
    for produto_id in &ordem_produtos {
        let Some(do_produto) = alocacoes.get(produto_id) else {
            continue;
        };
        let info = &demanda[produto_id];
        for aloc in do_produto {
            let grupo = grupos.entry(aloc.prateleira_id).or_insert_with(|| GrupoRota {
                prateleira_id: aloc.prateleira_id,
                prateleira: aloc.prateleira_nome.clone(),
                itens: Vec::new(),
            });
            grupo.itens.push(ItemRota {
                produto_id: *produto_id,
                produto_nome: info.produto_nome.clone(),
                produto_sku: info.produto_sku.clone(),
                caixas: aloc.caixas,
                unidades: aloc.unidades,
                insuficiente: aloc.insuficiente,
            });
        }
    }

    let mut rota_final: Vec<GrupoRota> = grupos.into_values().collect();
    rota_final.sort_by(|a, b| rota::comparar_rota(&a.prateleira, &b.prateleira));

    // Nenhuma alocação produzida (todo o estoque zerado): mantém os avisos
    // mas não apresenta rota vazia.
    if rota_final.is_empty() {
        rota_final = rota_das_bipagens(itens);
    }

    let mut vistos = std::collections::HashSet::new();
    avisos.retain(|a| vistos.insert(a.clone()));

    ResultadoAlocacao { alocacoes, rota: rota_final, avisos }
}

fn nova_alocacao(
    entrada: &EstoqueDisponivel,
    unidades: i64,
    unidades_caixa: i64,
    insuficiente: bool,
) -> Alocacao {
    Alocacao {
        prateleira_id: entrada.prateleira_id,
        prateleira_nome: entrada.prateleira_nome.clone(),
        caixas: caixas_arredondadas(unidades, unidades_caixa),
        unidades: unidades as i32,
        insuficiente,
        distribuidor_id: entrada.distribuidor_id,
    }
}

// Reparte `restante` unidades pelas entradas em ordem de preferência,
// tomando min(restante, disponível) de cada uma.
fn reparte_gulosa(
    entradas: &[EstoqueDisponivel],
    restante: i64,
    unidades_caixa: i64,
    ordem_bipagem: &[i64],
    insuficiente: bool,
    saida: &mut Vec<Alocacao>,
) {
    let mut ordenadas: Vec<&EstoqueDisponivel> = entradas.iter().collect();
    ordenadas.sort_by(|a, b| rota::comparar_preferencia(a, b, ordem_bipagem));

    let mut falta = restante;
    for entrada in ordenadas {
        if falta <= 0 {
            break;
        }
        let tomar = falta.min(i64::from(entrada.quantidade.max(0)));
        if tomar > 0 {
            saida.push(nova_alocacao(entrada, tomar, unidades_caixa, insuficiente));
        }
        falta -= tomar;
    }
}

// Teto da divisão: uma caixa parcial ainda precisa ser separada.
fn caixas_arredondadas(unidades: i64, unidades_caixa: i64) -> i32 {
    let fator = unidades_caixa.max(1);
    ((unidades + fator - 1) / fator) as i32
}

// Rota degradada: agrupa os próprios itens bipados por prateleira, com
// caixas e unidades pelo valor de face da bipagem.
fn rota_das_bipagens(itens: &[ItemBipado]) -> Vec<GrupoRota> {
    let mut grupos: Vec<GrupoRota> = Vec::new();
    for item in itens {
        let unidades = item.quantidade * item.unidades_por_caixa();
        let item_rota = ItemRota {
            produto_id: item.produto_id,
            produto_nome: item.produto_nome.clone(),
            produto_sku: item.produto_sku.clone(),
            caixas: item.quantidade,
            unidades,
            insuficiente: false,
        };
        match grupos.iter_mut().find(|g| g.prateleira_id == item.prateleira_id) {
            Some(grupo) => grupo.itens.push(item_rota),
            None => grupos.push(GrupoRota {
                prateleira_id: item.prateleira_id,
                prateleira: item.prateleira_nome.clone(),
                itens: vec![item_rota],
            }),
        }
    }
    grupos
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(produto_id: i64, prateleira_id: i64, nome_prateleira: &str, caixas: i32, qc: i32) -> ItemBipado {
        ItemBipado {
            produto_id,
            prateleira_id,
            produto_nome: format!("Produto {produto_id}"),
            produto_sku: format!("SKU-{produto_id}"),
            prateleira_nome: nome_prateleira.to_string(),
            quantidade: caixas,
            quantidade_caixa: qc,
        }
    }

    fn entrada(
        produto_id: i64,
        prateleira_id: i64,
        nome: &str,
        quantidade: i32,
        distribuidor_id: Option<i64>,
    ) -> EstoqueDisponivel {
        EstoqueDisponivel {
            produto_id,
            prateleira_id,
            prateleira_nome: nome.to_string(),
            quantidade,
            distribuidor_id,
        }
    }

    fn estoque(entradas: Vec<EstoqueDisponivel>) -> HashMap<i64, Vec<EstoqueDisponivel>> {
        let mut mapa: HashMap<i64, Vec<EstoqueDisponivel>> = HashMap::new();
        for e in entradas {
            mapa.entry(e.produto_id).or_default().push(e);
        }
        mapa
    }

    #[test]
    fn lista_vazia_resulta_em_nada() {
        let resultado = calcular_alocacoes(&[], &HashMap::new());
        assert!(resultado.alocacoes.is_empty());
        assert!(resultado.rota.is_empty());
        assert!(resultado.avisos.is_empty());
    }

    #[test]
    fn prateleira_unica_satisfaz_sem_repartir() {
        // 3 caixas de 10 unidades, A1 tem 50: uma única alocação de 30.
        let itens = vec![item(1, 10, "A1", 3, 10)];
        let mapa = estoque(vec![entrada(1, 10, "A1", 50, Some(7))]);

        let resultado = calcular_alocacoes(&itens, &mapa);

        let alocs = &resultado.alocacoes[&1];
        assert_eq!(alocs.len(), 1);
        assert_eq!(alocs[0].prateleira_id, 10);
        assert_eq!(alocs[0].unidades, 30);
        assert_eq!(alocs[0].caixas, 3);
        assert!(!alocs[0].insuficiente);
        assert_eq!(alocs[0].distribuidor_id, Some(7));
        assert!(resultado.avisos.is_empty());
    }

    #[test]
    fn quantidade_exata_nao_reparte() {
        let itens = vec![item(2, 30, "C10", 5, 1)];
        let mapa = estoque(vec![entrada(2, 30, "C10", 5, None)]);

        let resultado = calcular_alocacoes(&itens, &mapa);

        let alocs = &resultado.alocacoes[&2];
        assert_eq!(alocs.len(), 1);
        assert_eq!(alocs[0].unidades, 5);
        assert!(resultado.avisos.is_empty());
    }

    #[test]
    fn reparte_e_avisa_quando_falta() {
        // Precisa de 20; A3 tem 12 e B2 tem 5. Aloca 17 e avisa falta de 3.
        let itens = vec![item(1, 3, "A3", 20, 1)];
        let mapa = estoque(vec![
            entrada(1, 2, "B2", 5, Some(1)),
            entrada(1, 3, "A3", 12, Some(2)),
        ]);

        let resultado = calcular_alocacoes(&itens, &mapa);

        let alocs = &resultado.alocacoes[&1];
        assert_eq!(alocs.len(), 2);
        assert_eq!(alocs[0].prateleira_nome, "A3");
        assert_eq!(alocs[0].unidades, 12);
        assert_eq!(alocs[1].prateleira_nome, "B2");
        assert_eq!(alocs[1].unidades, 5);
        assert!(alocs.iter().all(|a| a.insuficiente));
        assert_eq!(resultado.avisos, vec!["Produto 1 (falta 3 unidades)".to_string()]);
    }

    #[test]
    fn conservacao_da_soma_alocada() {
        // Soma alocada por produto == min(necessário, disponível).
        let itens = vec![item(1, 1, "A1", 4, 5), item(1, 2, "A2", 2, 5)];
        let mapa = estoque(vec![
            entrada(1, 1, "A1", 13, None),
            entrada(1, 2, "A2", 9, None),
        ]);

        let resultado = calcular_alocacoes(&itens, &mapa);

        // Necessário: 6 caixas x 5 = 30; disponível: 22.
        let soma: i32 = resultado.alocacoes[&1].iter().map(|a| a.unidades).sum();
        assert_eq!(soma, 22);
        assert_eq!(resultado.avisos.len(), 1);
    }

    #[test]
    fn prefere_prateleira_bipada_entre_candidatas_equivalentes() {
        // Duas prateleiras de mesmo corredor/posição podem satisfazer tudo;
        // vence a que foi bipada.
        let itens = vec![item(1, 2, "A1b", 1, 10)];
        let mapa = estoque(vec![
            entrada(1, 1, "A1a", 40, None),
            entrada(1, 2, "A1b", 15, None),
        ]);

        let resultado = calcular_alocacoes(&itens, &mapa);

        let alocs = &resultado.alocacoes[&1];
        assert_eq!(alocs.len(), 1);
        assert_eq!(alocs[0].prateleira_id, 2);
    }

    #[test]
    fn caixa_parcial_arredonda_para_cima() {
        // 2 caixas de 10 = 20 unidades; nenhuma prateleira cobre sozinha.
        // 12 unidades em caixas de 10 = 2 caixas (uma parcial).
        let itens = vec![item(1, 1, "A1", 2, 10)];
        let mapa = estoque(vec![
            entrada(1, 1, "A1", 12, None),
            entrada(1, 2, "B1", 8, None),
        ]);

        let resultado = calcular_alocacoes(&itens, &mapa);

        let alocs = &resultado.alocacoes[&1];
        assert_eq!(alocs.len(), 2);
        assert_eq!(alocs[0].prateleira_nome, "A1");
        assert_eq!(alocs[0].unidades, 12);
        assert_eq!(alocs[0].caixas, 2);
        assert_eq!(alocs[1].prateleira_nome, "B1");
        assert_eq!(alocs[1].unidades, 8);
        assert_eq!(alocs[1].caixas, 1);
        assert!(resultado.avisos.is_empty());
    }

    #[test]
    fn rota_ordenada_em_serpentina() {
        // Alocações em A5, B2, B9 e C1: rota A5, B9, B2, C1.
        let itens = vec![
            item(1, 1, "A5", 1, 1),
            item(2, 2, "B2", 1, 1),
            item(3, 3, "B9", 1, 1),
            item(4, 4, "C1", 1, 1),
        ];
        let mapa = estoque(vec![
            entrada(1, 1, "A5", 10, None),
            entrada(2, 2, "B2", 10, None),
            entrada(3, 3, "B9", 10, None),
            entrada(4, 4, "C1", 10, None),
        ]);

        let resultado = calcular_alocacoes(&itens, &mapa);

        let nomes: Vec<&str> = resultado.rota.iter().map(|g| g.prateleira.as_str()).collect();
        assert_eq!(nomes, vec!["A5", "B9", "B2", "C1"]);
    }

    #[test]
    fn estoque_vazio_para_todos_cai_no_agrupamento_por_bipagem() {
        // Consulta falhou (vazia) para todos: rota pelo valor de face,
        // nenhum aviso fabricado.
        let itens = vec![
            item(1, 1, "A1", 2, 10),
            item(2, 2, "B3", 1, 1),
            item(3, 1, "A1", 1, 1),
        ];
        let resultado = calcular_alocacoes(&itens, &HashMap::new());

        assert!(resultado.alocacoes.is_empty());
        assert!(resultado.avisos.is_empty());
        assert_eq!(resultado.rota.len(), 2);
        assert_eq!(resultado.rota[0].prateleira, "A1");
        assert_eq!(resultado.rota[0].itens.len(), 2);
        assert_eq!(resultado.rota[0].itens[0].unidades, 20);
        assert_eq!(resultado.rota[1].prateleira, "B3");
    }

    #[test]
    fn estoque_zerado_mantem_aviso_e_rota_de_bipagem() {
        // Entradas existem mas estão zeradas: o aviso de falta permanece.
        let itens = vec![item(1, 1, "A1", 1, 1)];
        let mapa = estoque(vec![entrada(1, 1, "A1", 0, None)]);

        let resultado = calcular_alocacoes(&itens, &mapa);

        assert!(resultado.alocacoes.is_empty());
        assert_eq!(resultado.avisos.len(), 1);
        assert_eq!(resultado.rota.len(), 1);
    }

    #[test]
    fn avisos_repetidos_sao_deduplicados() {
        // O mesmo produto bipado em duas prateleiras gera um único aviso.
        let itens = vec![item(1, 1, "A1", 1, 10), item(1, 2, "A2", 1, 10)];
        let mapa = estoque(vec![entrada(1, 1, "A1", 3, None)]);

        let resultado = calcular_alocacoes(&itens, &mapa);

        assert_eq!(resultado.avisos.len(), 1);
        assert_eq!(resultado.avisos[0], "Produto 1 (falta 17 unidades)");
    }

    #[test]
    fn agrupa_produtos_diferentes_na_mesma_prateleira() {
        let itens = vec![item(1, 1, "A1", 1, 1), item(2, 1, "A1", 2, 1)];
        let mapa = estoque(vec![
            entrada(1, 1, "A1", 10, None),
            entrada(2, 1, "A1", 10, None),
        ]);

        let resultado = calcular_alocacoes(&itens, &mapa);

        assert_eq!(resultado.rota.len(), 1);
        assert_eq!(resultado.rota[0].itens.len(), 2);
    }
}
