// src/services/picking_service.rs
//
// O coração do sistema: a sessão de picking (cópia de trabalho em memória)
// e as transições de estado da ordem. Leituras de código e ajustes manuais
// só mexem na sessão; nada é persistido até o finalize, que é a única
// fronteira transacional. Uma sessão abandonada simplesmente se perde.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use sqlx::{Acquire, Executor, Postgres};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::PickingRepository,
    models::picking::{
        FinalizeStatus, ItemPickedUpdate, OrderDetail, OrderStatus, OrderSummary,
        PickingItemView, PickingOrder, ScanOutcome, ScanResult, SessionView,
    },
};

// --- Sessão de picking ---

/// Cópia de trabalho dos itens de UMA ordem durante uma sessão de separação.
/// Objeto explícito e puro: quem chama decide onde guardá-lo.
#[derive(Debug, Clone)]
pub struct PickingSession {
    pub order_id: Uuid,
    pub invoice_number: String,
    pub client_name: String,
    pub status: OrderStatus,
    pub items: Vec<PickingItemView>,
}

impl PickingSession {
    pub fn new(order: PickingOrder, items: Vec<PickingItemView>) -> Self {
        Self {
            order_id: order.id,
            invoice_number: order.invoice_number,
            client_name: order.client_name,
            status: order.status,
            items,
        }
    }

    /// Resolve um código lido e credita exatamente UMA unidade a UM item.
    ///
    /// Prioridade: barcode antes do código RUUFE, ambos sem distinção de
    /// maiúsculas. Código desconhecido e item já completo são avisos ao
    /// operador; a sessão nunca é abortada por uma leitura.
    pub fn scan(&mut self, code: &str) -> ScanResult {
        let needle = code.trim().to_lowercase();

        let found = self
            .items
            .iter()
            .position(|item| item.barcode.to_lowercase() == needle)
            .or_else(|| {
                self.items
                    .iter()
                    .position(|item| item.code.to_lowercase() == needle)
            });

        let Some(index) = found else {
            return ScanResult {
                outcome: ScanOutcome::UnknownCode,
                matched_item_id: None,
                new_picked_count: None,
                message: format!(
                    "O código {} não pertence a nenhum produto desta ordem.",
                    code.trim()
                ),
            };
        };

        let item = &mut self.items[index];

        if item.picked >= item.quantity {
            return ScanResult {
                outcome: ScanOutcome::AlreadyFulfilled,
                matched_item_id: Some(item.id),
                new_picked_count: Some(item.picked),
                message: format!(
                    "{} já tem todas as unidades separadas ({}/{}).",
                    item.product, item.quantity, item.quantity
                ),
            };
        }

        item.picked += 1;
        ScanResult {
            outcome: ScanOutcome::Matched,
            matched_item_id: Some(item.id),
            new_picked_count: Some(item.picked),
            message: format!("{} ({}/{})", item.product, item.picked, item.quantity),
        }
    }

    /// Ajuste manual de +1, saturado em 'quantity'. No teto é um no-op,
    /// não um erro (ao contrário da leitura, que avisa o operador).
    pub fn increment(&mut self, item_id: Uuid) -> Result<PickingItemView, AppError> {
        let item = self.item_mut(item_id)?;
        if item.picked < item.quantity {
            item.picked += 1;
        }
        Ok(item.clone())
    }

    /// Ajuste manual de -1, saturado em zero. Existe para corrigir leituras
    /// a mais; não há outro limite inferior de negócio.
    pub fn decrement(&mut self, item_id: Uuid) -> Result<PickingItemView, AppError> {
        let item = self.item_mut(item_id)?;
        if item.picked > 0 {
            item.picked -= 1;
        }
        Ok(item.clone())
    }

    fn item_mut(&mut self, item_id: Uuid) -> Result<&mut PickingItemView, AppError> {
        self.items
            .iter_mut()
            .find(|item| item.id == item_id)
            .ok_or(AppError::ItemNotFound)
    }

    pub fn total_quantity(&self) -> i32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    pub fn total_picked(&self) -> i32 {
        self.items.iter().map(|item| item.picked).sum()
    }

    /// Progresso em %, arredondado. Ordem sem unidades reporta 0 em vez de
    /// dividir por zero.
    pub fn progress(&self) -> i32 {
        let total = self.total_quantity();
        if total == 0 {
            return 0;
        }
        (100.0 * f64::from(self.total_picked()) / f64::from(total)).round() as i32
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            order_id: self.order_id,
            invoice_number: self.invoice_number.clone(),
            client_name: self.client_name.clone(),
            status: self.status,
            items: self.items.clone(),
            total_items: self.total_quantity(),
            picked_items: self.total_picked(),
            progress: self.progress(),
        }
    }
}

/// Regras de transição do finalize, separadas para serem testáveis a seco:
/// 'completed' é terminal; salvar 'partial' com tudo zerado não faz sentido.
/// Concluir com itens em falta é permitido: a completude é afirmada pelo
/// operador, não derivada pelo sistema.
fn finalize_guard(
    current_status: OrderStatus,
    target: FinalizeStatus,
    updates: &[ItemPickedUpdate],
) -> Result<(), AppError> {
    if current_status == OrderStatus::Completed {
        return Err(AppError::OrderAlreadyCompleted);
    }
    if target == FinalizeStatus::Partial && updates.iter().all(|u| u.picked == 0) {
        return Err(AppError::NothingPicked);
    }
    Ok(())
}

// --- Service ---

#[derive(Clone)]
pub struct PickingService {
    picking_repo: PickingRepository,
    // Uma sessão por ordem. O modelo é um único separador por ordem; o
    // Mutex serializa as operações da sessão. Progresso não finalizado
    // morre com o processo.
    sessions: Arc<Mutex<HashMap<Uuid, PickingSession>>>,
}

impl PickingService {
    pub fn new(picking_repo: PickingRepository) -> Self {
        Self {
            picking_repo,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn list_orders<'e, E>(
        &self,
        executor: E,
        status: Option<OrderStatus>,
    ) -> Result<Vec<OrderSummary>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.picking_repo.list_orders(executor, status).await
    }

    pub async fn get_order_detail<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
    ) -> Result<OrderDetail, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;
        let order = self
            .picking_repo
            .get_order(&mut *tx, order_id)
            .await?
            .ok_or(AppError::OrderNotFound)?;
        let items = self.picking_repo.get_order_items(&mut *tx, order_id).await?;
        tx.commit().await?;

        Ok(OrderDetail {
            header: order,
            items,
        })
    }

    /// Processa uma leitura de código contra a sessão da ordem, carregando
    /// a sessão do banco na primeira interação.
    pub async fn scan<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        code: &str,
    ) -> Result<ScanResult, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut sessions = self.sessions.lock().await;
        let session = match sessions.entry(order_id) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(self.load_session(executor, order_id).await?),
        };
        Ok(session.scan(code))
    }

    /// Ajuste manual (+1 ou -1) de um item da sessão.
    pub async fn adjust<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        item_id: Uuid,
        delta: i32,
    ) -> Result<PickingItemView, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut sessions = self.sessions.lock().await;
        let session = match sessions.entry(order_id) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(self.load_session(executor, order_id).await?),
        };
        if delta >= 0 {
            session.increment(item_id)
        } else {
            session.decrement(item_id)
        }
    }

    pub async fn get_session<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
    ) -> Result<SessionView, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut sessions = self.sessions.lock().await;
        let session = match sessions.entry(order_id) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(self.load_session(executor, order_id).await?),
        };
        Ok(session.view())
    }

    /// Persiste os valores finais de 'picked' e a transição de status de
    /// forma atômica: ou tudo entra, ou nada entra. Único caminho que grava
    /// progresso de picking no banco.
    pub async fn finalize<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        updates: &[ItemPickedUpdate],
        target: FinalizeStatus,
    ) -> Result<OrderDetail, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let current = self
            .picking_repo
            .get_order(&mut *tx, order_id)
            .await?
            .ok_or(AppError::OrderNotFound)?;

        finalize_guard(current.status, target, updates)?;

        for update in updates {
            self.picking_repo
                .update_item_picked(&mut *tx, order_id, update.id, update.picked)
                .await?;
        }

        let (status, completed_at) = match target {
            FinalizeStatus::Completed => (OrderStatus::Completed, Some(Utc::now())),
            FinalizeStatus::Partial => (OrderStatus::Partial, None),
        };

        let order = self
            .picking_repo
            .update_order_status(&mut *tx, order_id, status, completed_at)
            .await?;
        let items = self.picking_repo.get_order_items(&mut *tx, order_id).await?;

        tx.commit().await?;

        // A cópia de trabalho cumpriu o papel dela.
        self.sessions.lock().await.remove(&order_id);

        tracing::info!(
            "Ordem {} salva como {:?} ({} itens atualizados)",
            order.invoice_number,
            status,
            updates.len()
        );

        Ok(OrderDetail {
            header: order,
            items,
        })
    }

    async fn load_session<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
    ) -> Result<PickingSession, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;
        let order = self
            .picking_repo
            .get_order(&mut *tx, order_id)
            .await?
            .ok_or(AppError::OrderNotFound)?;
        let items = self.picking_repo.get_order_items(&mut *tx, order_id).await?;
        tx.commit().await?;

        Ok(PickingSession::new(order, items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(code: &str, barcode: &str, quantity: i32, picked: i32) -> PickingItemView {
        PickingItemView {
            id: Uuid::new_v4(),
            code: code.to_string(),
            brand: "RITUAL-BOTANICO".to_string(),
            product: format!("PRODUTO {code}"),
            barcode: barcode.to_string(),
            quantity,
            picked,
        }
    }

    fn session(items: Vec<PickingItemView>) -> PickingSession {
        PickingSession {
            order_id: Uuid::new_v4(),
            invoice_number: "RUM202505090921".to_string(),
            client_name: "Cliente de Ejemplo".to_string(),
            status: OrderStatus::Pending,
            items,
        }
    }

    fn update(id: Uuid, picked: i32) -> ItemPickedUpdate {
        ItemPickedUpdate { id, picked }
    }

    #[test]
    fn scan_credita_uma_unidade_por_leitura() {
        let mut s = session(vec![item("A2", "7861234567890", 2, 0)]);
        let id = s.items[0].id;

        let result = s.scan("7861234567890");
        assert_eq!(result.outcome, ScanOutcome::Matched);
        assert_eq!(result.matched_item_id, Some(id));
        assert_eq!(result.new_picked_count, Some(1));
        assert_eq!(s.items[0].picked, 1);
    }

    #[test]
    fn scan_prioriza_barcode_sobre_codigo() {
        // O barcode do primeiro item coincide com o código do segundo.
        let mut s = session(vec![item("A2", "A3", 2, 0), item("A3", "7861234567891", 2, 0)]);
        let first = s.items[0].id;

        let result = s.scan("A3");
        assert_eq!(result.matched_item_id, Some(first));
        assert_eq!(s.items[0].picked, 1);
        assert_eq!(s.items[1].picked, 0);
    }

    #[test]
    fn scan_por_barcode_e_por_codigo_resolvem_o_mesmo_item() {
        let mut s = session(vec![item("A2", "7861234567890", 2, 0)]);
        let id = s.items[0].id;

        assert_eq!(s.scan("7861234567890").matched_item_id, Some(id));
        assert_eq!(s.scan("A2").matched_item_id, Some(id));
        assert_eq!(s.items[0].picked, 2);
    }

    #[test]
    fn scan_ignora_maiusculas_e_espacos() {
        let mut s = session(vec![item("A2", "ABC123", 1, 0)]);

        let result = s.scan("  abc123 ");
        assert_eq!(result.outcome, ScanOutcome::Matched);
        assert_eq!(s.items[0].picked, 1);
    }

    #[test]
    fn scan_desconhecido_nao_altera_nada() {
        let mut s = session(vec![item("A2", "7861234567890", 2, 1)]);

        let result = s.scan("ZZZ");
        assert_eq!(result.outcome, ScanOutcome::UnknownCode);
        assert_eq!(result.matched_item_id, None);
        assert_eq!(result.new_picked_count, None);
        assert_eq!(s.items[0].picked, 1);
    }

    #[test]
    fn scan_nunca_passa_da_quantidade_pedida() {
        let mut s = session(vec![item("A2", "7861234567890", 2, 0)]);

        assert_eq!(s.scan("A2").outcome, ScanOutcome::Matched);
        assert_eq!(s.scan("A2").outcome, ScanOutcome::Matched);

        // A terceira leitura avisa e não mexe no contador.
        let third = s.scan("A2");
        assert_eq!(third.outcome, ScanOutcome::AlreadyFulfilled);
        assert_eq!(third.new_picked_count, Some(2));
        assert_eq!(s.items[0].picked, 2);
    }

    #[test]
    fn increment_satura_na_quantidade() {
        let mut s = session(vec![item("A2", "7861234567890", 1, 1)]);
        let id = s.items[0].id;

        let after = s.increment(id).unwrap();
        assert_eq!(after.picked, 1);
    }

    #[test]
    fn decrement_satura_em_zero() {
        let mut s = session(vec![item("A2", "7861234567890", 1, 0)]);
        let id = s.items[0].id;

        let after = s.decrement(id).unwrap();
        assert_eq!(after.picked, 0);
    }

    #[test]
    fn ajuste_em_item_inexistente_e_erro() {
        let mut s = session(vec![item("A2", "7861234567890", 1, 0)]);

        let result = s.increment(Uuid::new_v4());
        assert!(matches!(result, Err(AppError::ItemNotFound)));
    }

    #[test]
    fn progresso_arredonda_e_trata_ordem_vazia() {
        let s = session(vec![item("A2", "X", 3, 1)]);
        // 1/3 = 33,33% -> 33
        assert_eq!(s.progress(), 33);

        let vazia = session(vec![]);
        assert_eq!(vazia.progress(), 0);

        let zerada = session(vec![item("A2", "X", 0, 0)]);
        assert_eq!(zerada.progress(), 0);
    }

    #[test]
    fn finalize_guard_rejeita_parcial_sem_nada_separado() {
        let updates = vec![update(Uuid::new_v4(), 0), update(Uuid::new_v4(), 0)];
        let result = finalize_guard(OrderStatus::Pending, FinalizeStatus::Partial, &updates);
        assert!(matches!(result, Err(AppError::NothingPicked)));

        // Lista vazia também não tem o que salvar.
        let result = finalize_guard(OrderStatus::Pending, FinalizeStatus::Partial, &[]);
        assert!(matches!(result, Err(AppError::NothingPicked)));
    }

    #[test]
    fn finalize_guard_permite_concluir_com_itens_em_falta() {
        // Decisão explícita do operador; o sistema não impõe completude.
        let updates = vec![update(Uuid::new_v4(), 1)];
        assert!(finalize_guard(OrderStatus::Pending, FinalizeStatus::Completed, &updates).is_ok());
        assert!(finalize_guard(OrderStatus::Partial, FinalizeStatus::Completed, &updates).is_ok());
    }

    #[test]
    fn finalize_guard_trata_completed_como_terminal() {
        let updates = vec![update(Uuid::new_v4(), 1)];
        let result = finalize_guard(OrderStatus::Completed, FinalizeStatus::Partial, &updates);
        assert!(matches!(result, Err(AppError::OrderAlreadyCompleted)));
    }

    #[test]
    fn cenario_ordem_parcial() {
        // Ordem com A (qty 2) e B (qty 1). Duas leituras de A, uma leitura
        // desconhecida, e a ordem fica pronta para um salvamento parcial.
        let mut s = session(vec![
            item("A2", "7861234567890", 2, 0),
            item("A3", "7861234567891", 1, 0),
        ]);

        assert_eq!(s.scan("7861234567890").outcome, ScanOutcome::Matched);
        assert_eq!(s.scan("7861234567890").outcome, ScanOutcome::Matched);
        assert_eq!(s.scan("ZZZ").outcome, ScanOutcome::UnknownCode);

        assert_eq!(s.items[0].picked, 2);
        assert_eq!(s.items[1].picked, 0);
        assert_eq!(s.progress(), 67); // 2 de 3 unidades

        let updates: Vec<ItemPickedUpdate> = s
            .items
            .iter()
            .map(|i| update(i.id, i.picked))
            .collect();
        assert!(finalize_guard(s.status, FinalizeStatus::Partial, &updates).is_ok());
    }
}
