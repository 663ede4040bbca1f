// Política de ordenação de prateleiras.
//
// O nome de uma prateleira carrega o corredor (letra inicial) e a posição
// (dígitos seguintes). A rota de separação percorre os corredores em
// serpentina: A crescente, B decrescente, C crescente, D decrescente.

use std::cmp::Ordering;

use crate::models::estoque::EstoqueDisponivel;

// Ranking fixo dos corredores. Corredores desconhecidos vão para o fim.
fn ordem_grupo(grupo: Option<char>) -> u8 {
    match grupo {
        Some('A') => 0,
        Some('B') => 1,
        Some('C') => 2,
        Some('D') => 3,
        _ => 99,
    }
}

fn posicao_crescente(grupo: Option<char>) -> bool {
    matches!(grupo, Some('A') | Some('C'))
}

/// Extrai (corredor, posição) de um nome de prateleira, ex: "A40" -> (Some('A'), 40).
///
/// Função total: um nome sem letra inicial resulta em (None, 0).
pub fn parse_nome_prateleira(nome: &str) -> (Option<char>, u32) {
    let limpo = nome.trim();
    let mut chars = limpo.chars();
    let Some(primeiro) = chars.next() else {
        return (None, 0);
    };
    if !primeiro.is_ascii_alphabetic() {
        return (None, 0);
    }
    let grupo = primeiro.to_ascii_uppercase();
    let mut numero: u32 = 0;
    for c in chars {
        match c.to_digit(10) {
            Some(d) => numero = numero.saturating_mul(10).saturating_add(d),
            None => break,
        }
    }
    (Some(grupo), numero)
}

fn comparar_serpentina(nome_a: &str, nome_b: &str) -> Option<Ordering> {
    let (grupo_a, num_a) = parse_nome_prateleira(nome_a);
    let (grupo_b, num_b) = parse_nome_prateleira(nome_b);
    let rank_a = ordem_grupo(grupo_a);
    let rank_b = ordem_grupo(grupo_b);
    if rank_a != rank_b {
        return Some(rank_a.cmp(&rank_b));
    }
    if num_a != num_b {
        let ord = if posicao_crescente(grupo_a) {
            num_a.cmp(&num_b)
        } else {
            num_b.cmp(&num_a)
        };
        return Some(ord);
    }
    None
}

/// Ordem de preferência para alocar estoque.
///
/// Chaves, nesta ordem: corredor (serpentina), posição, índice da prateleira
/// na ordem de bipagem (quem não foi bipada vai para o fim) e quantidade
/// disponível decrescente. A ordem de bipagem entra como parâmetro explícito.
pub fn comparar_preferencia(
    a: &EstoqueDisponivel,
    b: &EstoqueDisponivel,
    ordem_bipagem: &[i64],
) -> Ordering {
    if let Some(ord) = comparar_serpentina(&a.prateleira_nome, &b.prateleira_nome) {
        return ord;
    }
    let indice = |id: i64| {
        ordem_bipagem
            .iter()
            .position(|&p| p == id)
            .unwrap_or(usize::MAX)
    };
    let ia = indice(a.prateleira_id);
    let ib = indice(b.prateleira_id);
    if ia != ib {
        return ia.cmp(&ib);
    }
    b.quantidade.cmp(&a.quantidade)
}

/// Ordem da rota impressa.
///
/// Usa apenas corredor e posição, com desempate lexicográfico pelo nome.
/// Ignora ordem de bipagem e quantidade: a rota é estável independente do
/// histórico da sessão.
pub fn comparar_rota(nome_a: &str, nome_b: &str) -> Ordering {
    match comparar_serpentina(nome_a, nome_b) {
        Some(ord) => ord,
        None => nome_a.cmp(nome_b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entrada(prateleira_id: i64, nome: &str, quantidade: i32) -> EstoqueDisponivel {
        EstoqueDisponivel {
            produto_id: 1,
            prateleira_id,
            prateleira_nome: nome.to_string(),
            quantidade,
            distribuidor_id: None,
        }
    }

    #[test]
    fn parse_extrai_grupo_e_posicao() {
        assert_eq!(parse_nome_prateleira("A40"), (Some('A'), 40));
        assert_eq!(parse_nome_prateleira(" b2 "), (Some('B'), 2));
        assert_eq!(parse_nome_prateleira("C"), (Some('C'), 0));
        assert_eq!(parse_nome_prateleira("Z123"), (Some('Z'), 123));
    }

    #[test]
    fn parse_sem_letra_inicial_nao_falha() {
        assert_eq!(parse_nome_prateleira(""), (None, 0));
        assert_eq!(parse_nome_prateleira("40"), (None, 0));
        assert_eq!(parse_nome_prateleira("-A1"), (None, 0));
    }

    #[test]
    fn rota_serpentina_alterna_direcao_por_corredor() {
        // Cenário clássico: A5, B2, B9, C1 -> A5, B9, B2, C1.
        let mut nomes = vec!["B2", "C1", "A5", "B9"];
        nomes.sort_by(|a, b| comparar_rota(a, b));
        assert_eq!(nomes, vec!["A5", "B9", "B2", "C1"]);
    }

    #[test]
    fn rota_corredor_desconhecido_vai_para_o_fim() {
        let mut nomes = vec!["X1", "A1", "D3"];
        nomes.sort_by(|a, b| comparar_rota(a, b));
        assert_eq!(nomes, vec!["A1", "D3", "X1"]);
    }

    #[test]
    fn rota_desempata_pelo_nome() {
        // Mesmo corredor e posição (sem dígitos): ordem lexicográfica.
        let mut nomes = vec!["A0b", "A0a"];
        nomes.sort_by(|a, b| comparar_rota(a, b));
        assert_eq!(nomes, vec!["A0a", "A0b"]);
    }

    #[test]
    fn preferencia_segue_corredor_antes_de_bipagem() {
        let a3 = entrada(1, "A3", 12);
        let b2 = entrada(2, "B2", 5);
        // Mesmo com B2 bipada primeiro, A3 vem antes na serpentina.
        let ordem = vec![2, 1];
        assert_eq!(comparar_preferencia(&a3, &b2, &ordem), Ordering::Less);
    }

    #[test]
    fn preferencia_desempata_pela_ordem_de_bipagem() {
        // Nomes com mesmo corredor e posição.
        let p1 = entrada(1, "A1", 10);
        let p2 = entrada(2, "A1", 10);
        let ordem = vec![2, 1];
        assert_eq!(comparar_preferencia(&p1, &p2, &ordem), Ordering::Greater);
        assert_eq!(comparar_preferencia(&p2, &p1, &ordem), Ordering::Less);
    }

    #[test]
    fn preferencia_nao_bipada_perde_para_bipada() {
        let p1 = entrada(1, "A1", 10);
        let p2 = entrada(2, "A1", 99);
        let ordem = vec![1];
        assert_eq!(comparar_preferencia(&p1, &p2, &ordem), Ordering::Less);
    }

    #[test]
    fn preferencia_final_maior_quantidade_primeiro() {
        let p1 = entrada(1, "A1", 10);
        let p2 = entrada(2, "A1", 30);
        assert_eq!(comparar_preferencia(&p1, &p2, &[]), Ordering::Greater);
        assert_eq!(comparar_preferencia(&p2, &p1, &[]), Ordering::Less);
    }
}
