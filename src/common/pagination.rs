use serde::Deserialize;
use utoipa::IntoParams;

const LIMITE_PADRAO: i64 = 100;
const LIMITE_MAXIMO: i64 = 500;

// Parâmetros de paginação usados por todas as listagens (?page=1&limit=100).
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct Paginacao {
    #[serde(default = "pagina_padrao")]
    pub page: i64,
    #[serde(default = "limite_padrao")]
    pub limit: i64,
}

fn pagina_padrao() -> i64 {
    1
}

fn limite_padrao() -> i64 {
    LIMITE_PADRAO
}

impl Default for Paginacao {
    fn default() -> Self {
        Self { page: 1, limit: LIMITE_PADRAO }
    }
}

impl Paginacao {
    pub fn limite(&self) -> i64 {
        self.limit.clamp(1, LIMITE_MAXIMO)
    }

    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1) * self.limite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_comeca_em_zero() {
        let p = Paginacao { page: 1, limit: 100 };
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn pagina_invalida_vira_primeira() {
        let p = Paginacao { page: 0, limit: 50 };
        assert_eq!(p.offset(), 0);
        let p = Paginacao { page: -3, limit: 50 };
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn limite_e_truncado() {
        let p = Paginacao { page: 2, limit: 10_000 };
        assert_eq!(p.limite(), LIMITE_MAXIMO);
        assert_eq!(p.offset(), LIMITE_MAXIMO);
    }
}
