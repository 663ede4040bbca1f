// Sessões de bipagem de romaneio.
//
// Cada romaneio aberto tem uma sessão em memória com a lista de itens na
// ordem de bipagem e o último resultado de alocação. Toda mutação roda sob o
// mutex da sessão: gatilhos concorrentes enfileiram e o recálculo sempre vê a
// lista mais recente.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::common::error::AppError;
use crate::models::estoque::{EstoqueDisponivel, EstoqueLocalizado};
use crate::models::picking::{
    ItemBipado, ResultadoAlocacao, ResumoFinalizacao, Romaneio, RomaneioStatus, SessaoSnapshot,
};
use crate::services::alocacao;

// Tempo máximo de uma consulta de estoque durante o recálculo. Estourar o
// prazo equivale a estoque vazio para aquele produto.
const TIMEOUT_CONSULTA: Duration = Duration::from_secs(5);

/// Contrato de acesso ao estoque (consulta e baixa).
#[async_trait]
pub trait EstoqueLedger: Send + Sync {
    async fn buscar_por_produto(&self, produto_id: i64) -> Result<Vec<EstoqueDisponivel>, AppError>;

    async fn buscar_por_cod_barras(
        &self,
        cod_barras: &str,
    ) -> Result<Option<EstoqueLocalizado>, AppError>;

    /// Ajusta a quantidade de uma partição (produto, prateleira, distribuidor).
    /// Uma baixa que deixaria a quantidade negativa é recusada com
    /// `EstoqueInsuficiente`, nunca truncada.
    async fn ajustar_quantidade(
        &self,
        produto_id: i64,
        prateleira_id: i64,
        distribuidor_id: i64,
        delta: i32,
    ) -> Result<(), AppError>;
}

/// Contrato de persistência dos romaneios e seus itens.
#[async_trait]
pub trait PickingStore: Send + Sync {
    async fn buscar_romaneio(&self, id: i64) -> Result<Option<Romaneio>, AppError>;

    async fn listar_itens(&self, romaneio_id: i64) -> Result<Vec<ItemBipado>, AppError>;

    async fn upsert_item(
        &self,
        romaneio_id: i64,
        produto_id: i64,
        prateleira_id: i64,
        quantidade: i32,
    ) -> Result<(), AppError>;

    async fn remover_item(
        &self,
        romaneio_id: i64,
        produto_id: i64,
        prateleira_id: i64,
    ) -> Result<(), AppError>;

    async fn definir_status(&self, romaneio_id: i64, status: RomaneioStatus)
        -> Result<(), AppError>;
}

struct Sessao {
    romaneio: Romaneio,
    itens: Vec<ItemBipado>,
    resultado: ResultadoAlocacao,
}

impl Sessao {
    fn snapshot(&self) -> SessaoSnapshot {
        SessaoSnapshot {
            romaneio: self.romaneio.clone(),
            itens: self.itens.clone(),
            rota: self.resultado.rota.clone(),
            alocacoes: self.resultado.alocacoes.clone(),
            avisos: self.resultado.avisos.clone(),
        }
    }
}

pub struct PickingService {
    ledger: Arc<dyn EstoqueLedger>,
    store: Arc<dyn PickingStore>,
    sessoes: Mutex<HashMap<i64, Arc<Mutex<Sessao>>>>,
}

impl PickingService {
    pub fn new(ledger: Arc<dyn EstoqueLedger>, store: Arc<dyn PickingStore>) -> Self {
        Self { ledger, store, sessoes: Mutex::new(HashMap::new()) }
    }

    /// Abre (ou retoma) a sessão de bipagem de um romaneio.
    ///
    /// Carrega os itens persistidos, recalcula as alocações e move o status
    /// de `pendente` para `em_andamento`.
    pub async fn abrir(&self, romaneio_id: i64) -> Result<SessaoSnapshot, AppError> {
        let sessao = self.sessao(romaneio_id).await?;
        let mut guarda = sessao.lock().await;

        if guarda.romaneio.status == RomaneioStatus::Pendente.as_str() {
            self.store.definir_status(romaneio_id, RomaneioStatus::EmAndamento).await?;
            guarda.romaneio.status = RomaneioStatus::EmAndamento.as_str().to_string();
        }

        Ok(guarda.snapshot())
    }

    /// Registra a bipagem de um código de barras.
    ///
    /// Se já existe uma linha (produto, prateleira), soma 1 caixa; senão cria
    /// a linha com quantidade 1. Código desconhecido não muta nada.
    pub async fn bipar(
        &self,
        romaneio_id: i64,
        cod_barras: &str,
    ) -> Result<SessaoSnapshot, AppError> {
        let sessao = self.sessao(romaneio_id).await?;
        let mut guarda = sessao.lock().await;
        Self::exige_aberto(&guarda)?;

        let achado = self
            .ledger
            .buscar_por_cod_barras(cod_barras)
            .await?
            .ok_or(AppError::CodigoBarrasNaoEncontrado)?;

        let existente = guarda
            .itens
            .iter()
            .position(|i| i.produto_id == achado.produto_id && i.prateleira_id == achado.prateleira_id);

        match existente {
            Some(indice) => {
                let nova_quantidade = guarda.itens[indice].quantidade + 1;
                self.store
                    .upsert_item(romaneio_id, achado.produto_id, achado.prateleira_id, nova_quantidade)
                    .await?;
                guarda.itens[indice].quantidade = nova_quantidade;
            }
            None => {
                self.store
                    .upsert_item(romaneio_id, achado.produto_id, achado.prateleira_id, 1)
                    .await?;
                guarda.itens.push(ItemBipado {
                    produto_id: achado.produto_id,
                    prateleira_id: achado.prateleira_id,
                    produto_nome: achado.produto_nome,
                    produto_sku: achado.produto_sku,
                    prateleira_nome: achado.prateleira_nome,
                    quantidade: 1,
                    quantidade_caixa: achado.quantidade_caixa.max(1),
                });
            }
        }

        self.recalcular(&mut guarda).await;
        Ok(guarda.snapshot())
    }

    /// Edita a quantidade de caixas de uma linha. Valores abaixo de 1 são
    /// grampeados em 1; remover é uma operação separada.
    pub async fn alterar_quantidade(
        &self,
        romaneio_id: i64,
        produto_id: i64,
        prateleira_id: i64,
        quantidade: i32,
    ) -> Result<SessaoSnapshot, AppError> {
        let sessao = self.sessao(romaneio_id).await?;
        let mut guarda = sessao.lock().await;
        Self::exige_aberto(&guarda)?;

        let quantidade = quantidade.max(1);
        let indice = guarda
            .itens
            .iter()
            .position(|i| i.produto_id == produto_id && i.prateleira_id == prateleira_id)
            .ok_or(AppError::RegistroNaoEncontrado)?;

        self.store.upsert_item(romaneio_id, produto_id, prateleira_id, quantidade).await?;
        guarda.itens[indice].quantidade = quantidade;

        self.recalcular(&mut guarda).await;
        Ok(guarda.snapshot())
    }

    /// Remove uma linha da lista de bipagem.
    pub async fn remover_item(
        &self,
        romaneio_id: i64,
        produto_id: i64,
        prateleira_id: i64,
    ) -> Result<SessaoSnapshot, AppError> {
        let sessao = self.sessao(romaneio_id).await?;
        let mut guarda = sessao.lock().await;
        Self::exige_aberto(&guarda)?;

        self.store.remover_item(romaneio_id, produto_id, prateleira_id).await?;
        guarda
            .itens
            .retain(|i| !(i.produto_id == produto_id && i.prateleira_id == prateleira_id));

        self.recalcular(&mut guarda).await;
        Ok(guarda.snapshot())
    }

    /// Finaliza o romaneio: aplica as baixas da última alocação calculada e
    /// marca o romaneio como concluído.
    ///
    /// Cada baixa é uma requisição independente; falhas individuais são
    /// registradas e contadas, nunca abortam a finalização.
    pub async fn finalizar(&self, romaneio_id: i64) -> Result<ResumoFinalizacao, AppError> {
        let sessao = self.sessao(romaneio_id).await?;
        let mut guarda = sessao.lock().await;
        Self::exige_aberto(&guarda)?;

        // Rejeitado antes de qualquer E/S.
        if guarda.itens.is_empty() {
            return Err(AppError::RomaneioVazio);
        }

        let mut retiradas: u32 = 0;
        let mut ignoradas: u32 = 0;

        for (produto_id, alocs) in &guarda.resultado.alocacoes {
            for aloc in alocs {
                let distribuidor = match aloc.distribuidor_id {
                    Some(d) => Some(d),
                    None => self.resolver_distribuidor(*produto_id, aloc.prateleira_id).await,
                };

                let Some(distribuidor) = distribuidor else {
                    tracing::warn!(
                        produto_id,
                        prateleira_id = aloc.prateleira_id,
                        "Distribuidor não encontrado para retirada, baixa ignorada"
                    );
                    ignoradas += 1;
                    continue;
                };

                match self
                    .ledger
                    .ajustar_quantidade(*produto_id, aloc.prateleira_id, distribuidor, -aloc.unidades)
                    .await
                {
                    Ok(()) => retiradas += 1,
                    Err(e) => {
                        tracing::warn!(
                            produto_id,
                            prateleira_id = aloc.prateleira_id,
                            distribuidor_id = distribuidor,
                            erro = %e,
                            "Falha ao retirar estoque, baixa ignorada"
                        );
                        ignoradas += 1;
                    }
                }
            }
        }

        self.store.definir_status(romaneio_id, RomaneioStatus::Concluido).await?;
        guarda.romaneio.status = RomaneioStatus::Concluido.as_str().to_string();
        drop(guarda);

        // Sessão encerrada; uma nova abertura recarrega do banco.
        self.sessoes.lock().await.remove(&romaneio_id);

        Ok(ResumoFinalizacao { retiradas, ignoradas })
    }

    /// Descarta a sessão em memória (romaneio excluído ou abandonado).
    pub async fn descartar(&self, romaneio_id: i64) {
        self.sessoes.lock().await.remove(&romaneio_id);
    }

    // Uma alocação sem distribuidor é resolvida reconsultando o estoque da
    // prateleira; havendo mais de uma partição, vence a de maior quantidade.
    async fn resolver_distribuidor(&self, produto_id: i64, prateleira_id: i64) -> Option<i64> {
        let entradas = match self.ledger.buscar_por_produto(produto_id).await {
            Ok(entradas) => entradas,
            Err(e) => {
                tracing::warn!(produto_id, erro = %e, "Falha ao reconsultar estoque");
                return None;
            }
        };
        entradas
            .into_iter()
            .filter(|e| e.prateleira_id == prateleira_id && e.distribuidor_id.is_some())
            .max_by_key(|e| e.quantidade)
            .and_then(|e| e.distribuidor_id)
    }

    // Recalcula as alocações para a lista corrente. As consultas de estoque
    // saem em paralelo, uma por produto distinto; falha ou timeout de uma
    // consulta equivale a estoque vazio para aquele produto.
    async fn recalcular(&self, sessao: &mut Sessao) {
        let mut produto_ids: Vec<i64> = Vec::new();
        for item in &sessao.itens {
            if !produto_ids.contains(&item.produto_id) {
                produto_ids.push(item.produto_id);
            }
        }

        let consultas = produto_ids.iter().map(|&produto_id| {
            let ledger = Arc::clone(&self.ledger);
            async move {
                match tokio::time::timeout(TIMEOUT_CONSULTA, ledger.buscar_por_produto(produto_id))
                    .await
                {
                    Ok(Ok(entradas)) => entradas,
                    Ok(Err(e)) => {
                        tracing::warn!(produto_id, erro = %e, "Falha na consulta de estoque");
                        Vec::new()
                    }
                    Err(_) => {
                        tracing::warn!(produto_id, "Consulta de estoque estourou o tempo limite");
                        Vec::new()
                    }
                }
            }
        });
        let resultados = futures::future::join_all(consultas).await;

        let estoque_por_produto: HashMap<i64, Vec<EstoqueDisponivel>> =
            produto_ids.into_iter().zip(resultados).collect();

        sessao.resultado = alocacao::calcular_alocacoes(&sessao.itens, &estoque_por_produto);
    }

    fn exige_aberto(sessao: &Sessao) -> Result<(), AppError> {
        if sessao.romaneio.status == RomaneioStatus::Concluido.as_str() {
            return Err(AppError::RomaneioJaConcluido);
        }
        Ok(())
    }

    // Busca a sessão no mapa ou carrega do banco.
    async fn sessao(&self, romaneio_id: i64) -> Result<Arc<Mutex<Sessao>>, AppError> {
        let mut sessoes = self.sessoes.lock().await;
        if let Some(sessao) = sessoes.get(&romaneio_id) {
            return Ok(Arc::clone(sessao));
        }

        let romaneio = self
            .store
            .buscar_romaneio(romaneio_id)
            .await?
            .ok_or(AppError::RomaneioNaoEncontrado)?;
        let itens = self.store.listar_itens(romaneio_id).await?;

        let mut sessao = Sessao { romaneio, itens, resultado: ResultadoAlocacao::default() };
        self.recalcular(&mut sessao).await;

        let sessao = Arc::new(Mutex::new(sessao));
        sessoes.insert(romaneio_id, Arc::clone(&sessao));
        Ok(sessao)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Mutex as StdMutex;

    struct LedgerFake {
        entradas: StdMutex<Vec<EstoqueDisponivel>>,
        por_cod_barras: StdMutex<HashMap<String, EstoqueLocalizado>>,
        retiradas: StdMutex<Vec<(i64, i64, i64, i32)>>,
        recusar_prateleira: StdMutex<Option<i64>>,
    }

    impl LedgerFake {
        fn nova() -> Self {
            Self {
                entradas: StdMutex::new(Vec::new()),
                por_cod_barras: StdMutex::new(HashMap::new()),
                retiradas: StdMutex::new(Vec::new()),
                recusar_prateleira: StdMutex::new(None),
            }
        }

        fn com_entrada(
            self,
            produto_id: i64,
            prateleira_id: i64,
            nome: &str,
            quantidade: i32,
            distribuidor_id: Option<i64>,
        ) -> Self {
            self.entradas.lock().unwrap().push(EstoqueDisponivel {
                produto_id,
                prateleira_id,
                prateleira_nome: nome.to_string(),
                quantidade,
                distribuidor_id,
            });
            self
        }

        fn com_cod_barras(
            self,
            cod: &str,
            produto_id: i64,
            prateleira_id: i64,
            nome_prateleira: &str,
        ) -> Self {
            self.por_cod_barras.lock().unwrap().insert(
                cod.to_string(),
                EstoqueLocalizado {
                    produto_id,
                    prateleira_id,
                    produto_nome: format!("Produto {produto_id}"),
                    produto_sku: format!("SKU-{produto_id}"),
                    prateleira_nome: nome_prateleira.to_string(),
                    quantidade_caixa: 1,
                    quantidade: 100,
                    distribuidor_id: None,
                },
            );
            self
        }
    }

    #[async_trait]
    impl EstoqueLedger for LedgerFake {
        async fn buscar_por_produto(
            &self,
            produto_id: i64,
        ) -> Result<Vec<EstoqueDisponivel>, AppError> {
            Ok(self
                .entradas
                .lock()
                .unwrap()
                .iter()
                .filter(|e| e.produto_id == produto_id)
                .cloned()
                .collect())
        }

        async fn buscar_por_cod_barras(
            &self,
            cod_barras: &str,
        ) -> Result<Option<EstoqueLocalizado>, AppError> {
            Ok(self.por_cod_barras.lock().unwrap().get(cod_barras).cloned())
        }

        async fn ajustar_quantidade(
            &self,
            produto_id: i64,
            prateleira_id: i64,
            distribuidor_id: i64,
            delta: i32,
        ) -> Result<(), AppError> {
            if *self.recusar_prateleira.lock().unwrap() == Some(prateleira_id) {
                return Err(AppError::EstoqueInsuficiente);
            }
            self.retiradas
                .lock()
                .unwrap()
                .push((produto_id, prateleira_id, distribuidor_id, delta));
            Ok(())
        }
    }

    struct StoreFake {
        romaneio: StdMutex<Romaneio>,
        itens: StdMutex<Vec<(i64, i64, i32)>>,
    }

    impl StoreFake {
        fn novo(status: RomaneioStatus) -> Self {
            Self {
                romaneio: StdMutex::new(Romaneio {
                    id: 1,
                    numero: "RM-001".to_string(),
                    descricao: String::new(),
                    status: status.as_str().to_string(),
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                }),
                itens: StdMutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PickingStore for StoreFake {
        async fn buscar_romaneio(&self, id: i64) -> Result<Option<Romaneio>, AppError> {
            let romaneio = self.romaneio.lock().unwrap().clone();
            Ok((romaneio.id == id).then_some(romaneio))
        }

        async fn listar_itens(&self, _romaneio_id: i64) -> Result<Vec<ItemBipado>, AppError> {
            Ok(Vec::new())
        }

        async fn upsert_item(
            &self,
            _romaneio_id: i64,
            produto_id: i64,
            prateleira_id: i64,
            quantidade: i32,
        ) -> Result<(), AppError> {
            let mut itens = self.itens.lock().unwrap();
            match itens
                .iter_mut()
                .find(|(p, pr, _)| *p == produto_id && *pr == prateleira_id)
            {
                Some(linha) => linha.2 = quantidade,
                None => itens.push((produto_id, prateleira_id, quantidade)),
            }
            Ok(())
        }

        async fn remover_item(
            &self,
            _romaneio_id: i64,
            produto_id: i64,
            prateleira_id: i64,
        ) -> Result<(), AppError> {
            self.itens
                .lock()
                .unwrap()
                .retain(|(p, pr, _)| !(*p == produto_id && *pr == prateleira_id));
            Ok(())
        }

        async fn definir_status(
            &self,
            _romaneio_id: i64,
            status: RomaneioStatus,
        ) -> Result<(), AppError> {
            self.romaneio.lock().unwrap().status = status.as_str().to_string();
            Ok(())
        }
    }

    fn servico(ledger: LedgerFake, store: StoreFake) -> (PickingService, Arc<LedgerFake>, Arc<StoreFake>) {
        let ledger = Arc::new(ledger);
        let store = Arc::new(store);
        let servico = PickingService::new(
            Arc::clone(&ledger) as Arc<dyn EstoqueLedger>,
            Arc::clone(&store) as Arc<dyn PickingStore>,
        );
        (servico, ledger, store)
    }

    #[tokio::test]
    async fn bipar_duas_vezes_soma_na_mesma_linha() {
        let ledger = LedgerFake::nova()
            .com_cod_barras("789100", 1, 10, "A1")
            .com_entrada(1, 10, "A1", 100, Some(3));
        let (servico, _, store) = servico(ledger, StoreFake::novo(RomaneioStatus::EmAndamento));

        servico.bipar(1, "789100").await.unwrap();
        let snapshot = servico.bipar(1, "789100").await.unwrap();

        assert_eq!(snapshot.itens.len(), 1);
        assert_eq!(snapshot.itens[0].quantidade, 2);
        assert_eq!(*store.itens.lock().unwrap(), vec![(1, 10, 2)]);
    }

    #[tokio::test]
    async fn bipar_codigo_desconhecido_nao_muta_nada() {
        let ledger = LedgerFake::nova();
        let (servico, _, store) = servico(ledger, StoreFake::novo(RomaneioStatus::EmAndamento));

        let erro = servico.bipar(1, "000000").await.unwrap_err();

        assert!(matches!(erro, AppError::CodigoBarrasNaoEncontrado));
        assert!(store.itens.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn abrir_move_pendente_para_em_andamento() {
        let ledger = LedgerFake::nova();
        let (servico, _, store) = servico(ledger, StoreFake::novo(RomaneioStatus::Pendente));

        let snapshot = servico.abrir(1).await.unwrap();

        assert_eq!(snapshot.romaneio.status, "em_andamento");
        assert_eq!(store.romaneio.lock().unwrap().status, "em_andamento");
    }

    #[tokio::test]
    async fn alterar_quantidade_grampeia_em_um() {
        let ledger = LedgerFake::nova()
            .com_cod_barras("789100", 1, 10, "A1")
            .com_entrada(1, 10, "A1", 100, Some(3));
        let (servico, _, _) = servico(ledger, StoreFake::novo(RomaneioStatus::EmAndamento));

        servico.bipar(1, "789100").await.unwrap();
        let snapshot = servico.alterar_quantidade(1, 1, 10, 0).await.unwrap();

        assert_eq!(snapshot.itens[0].quantidade, 1);
    }

    #[tokio::test]
    async fn remover_item_apaga_a_linha() {
        let ledger = LedgerFake::nova()
            .com_cod_barras("789100", 1, 10, "A1")
            .com_entrada(1, 10, "A1", 100, Some(3));
        let (servico, _, store) = servico(ledger, StoreFake::novo(RomaneioStatus::EmAndamento));

        servico.bipar(1, "789100").await.unwrap();
        let snapshot = servico.remover_item(1, 1, 10).await.unwrap();

        assert!(snapshot.itens.is_empty());
        assert!(snapshot.rota.is_empty());
        assert!(store.itens.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn finalizar_sem_itens_rejeita_antes_de_qualquer_baixa() {
        let ledger = LedgerFake::nova();
        let (servico, ledger, store) = servico(ledger, StoreFake::novo(RomaneioStatus::EmAndamento));

        let erro = servico.finalizar(1).await.unwrap_err();

        assert!(matches!(erro, AppError::RomaneioVazio));
        assert!(ledger.retiradas.lock().unwrap().is_empty());
        assert_eq!(store.romaneio.lock().unwrap().status, "em_andamento");
    }

    #[tokio::test]
    async fn finalizar_aplica_baixas_da_ultima_alocacao() {
        let ledger = LedgerFake::nova()
            .com_cod_barras("789100", 1, 10, "A1")
            .com_entrada(1, 10, "A1", 100, Some(3));
        let (servico, ledger, store) = servico(ledger, StoreFake::novo(RomaneioStatus::EmAndamento));

        servico.bipar(1, "789100").await.unwrap();
        servico.bipar(1, "789100").await.unwrap();
        let resumo = servico.finalizar(1).await.unwrap();

        assert_eq!(resumo.retiradas, 1);
        assert_eq!(resumo.ignoradas, 0);
        assert_eq!(*ledger.retiradas.lock().unwrap(), vec![(1, 10, 3, -2)]);
        assert_eq!(store.romaneio.lock().unwrap().status, "concluido");
    }

    #[tokio::test]
    async fn finalizar_resolve_distribuidor_pela_maior_particao() {
        // A alocação sai sem distribuidor; na finalização a reconsulta
        // encontra duas partições e escolhe a de maior quantidade.
        let ledger = LedgerFake::nova()
            .com_cod_barras("789100", 1, 10, "A1")
            .com_entrada(1, 10, "A1", 50, None);
        let (servico, ledger, _) = servico(ledger, StoreFake::novo(RomaneioStatus::EmAndamento));

        servico.bipar(1, "789100").await.unwrap();

        // Entre o cálculo e a finalização, o estoque passa a expor as partições.
        {
            let mut entradas = ledger.entradas.lock().unwrap();
            entradas.clear();
            for (dist, qtd) in [(7, 30), (8, 20)] {
                entradas.push(EstoqueDisponivel {
                    produto_id: 1,
                    prateleira_id: 10,
                    prateleira_nome: "A1".to_string(),
                    quantidade: qtd,
                    distribuidor_id: Some(dist),
                });
            }
        }

        let resumo = servico.finalizar(1).await.unwrap();

        assert_eq!(resumo.retiradas, 1);
        let retiradas = ledger.retiradas.lock().unwrap();
        assert_eq!(retiradas[0].2, 7);
    }

    #[tokio::test]
    async fn finalizar_conta_baixas_recusadas_e_conclui_mesmo_assim() {
        let ledger = LedgerFake::nova()
            .com_cod_barras("789100", 1, 10, "A1")
            .com_cod_barras("789200", 2, 20, "B1")
            .com_entrada(1, 10, "A1", 100, Some(3))
            .com_entrada(2, 20, "B1", 100, Some(4));
        let (servico, ledger, store) = servico(ledger, StoreFake::novo(RomaneioStatus::EmAndamento));

        servico.bipar(1, "789100").await.unwrap();
        servico.bipar(1, "789200").await.unwrap();
        *ledger.recusar_prateleira.lock().unwrap() = Some(20);

        let resumo = servico.finalizar(1).await.unwrap();

        assert_eq!(resumo.retiradas, 1);
        assert_eq!(resumo.ignoradas, 1);
        assert_eq!(store.romaneio.lock().unwrap().status, "concluido");
    }

    #[tokio::test]
    async fn romaneio_concluido_nao_aceita_bipagem() {
        let ledger = LedgerFake::nova().com_cod_barras("789100", 1, 10, "A1");
        let (servico, _, _) = servico(ledger, StoreFake::novo(RomaneioStatus::Concluido));

        let erro = servico.bipar(1, "789100").await.unwrap_err();

        assert!(matches!(erro, AppError::RomaneioJaConcluido));
    }

    #[tokio::test]
    async fn consulta_vazia_usa_rota_de_bipagem_sem_avisos() {
        // Sem nenhuma entrada de estoque a rota agrupa pelo que foi bipado.
        let ledger = LedgerFake::nova().com_cod_barras("789100", 1, 10, "A1");
        let (servico, _, _) = servico(ledger, StoreFake::novo(RomaneioStatus::EmAndamento));

        let snapshot = servico.bipar(1, "789100").await.unwrap();

        assert!(snapshot.avisos.is_empty());
        assert_eq!(snapshot.rota.len(), 1);
        assert_eq!(snapshot.rota[0].prateleira, "A1");
        assert!(snapshot.alocacoes.is_empty());
    }
}
