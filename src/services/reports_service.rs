// src/services/reports_service.rs
//
// Visões derivadas e somente-leitura sobre as ordens persistidas. Nenhuma
// regra de negócio além da agregação; os cálculos são funções puras sobre
// as linhas que o repositório devolve.

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};
use std::collections::BTreeMap;

use crate::{
    common::error::AppError,
    db::ReportsRepository,
    models::reports::{
        ChartEntry, MissingItem, MissingItemRow, MissingItemsReport, MissingOrderRef,
        MissingStats, PartialOrderProgress, PartialOrderRow, PerformanceEntry, PerformanceRow,
        PickingStats,
    },
};

// --- Cálculos puros ---

/// Duração em minutos, arredondada (não truncada).
fn duration_minutes(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    ((end - start).num_seconds() as f64 / 60.0).round() as i64
}

/// Unidades por minuto com duas casas; duração zero reporta 0, nunca
/// infinito ou NaN.
fn items_per_minute(picked_items: i64, duration: i64) -> f64 {
    if duration <= 0 {
        return 0.0;
    }
    (picked_items as f64 / duration as f64 * 100.0).round() / 100.0
}

fn progress_percent(picked: i64, total: i64) -> i32 {
    if total <= 0 {
        return 0;
    }
    (100.0 * picked as f64 / total as f64).round() as i32
}

/// Agrega os faltantes por produto, preservando a ordem de chegada e
/// deduplicando as ordens que contribuem para cada produto.
fn aggregate_missing(rows: &[MissingItemRow]) -> Vec<MissingItem> {
    let mut items: Vec<MissingItem> = Vec::new();

    for row in rows {
        let missing = i64::from(row.quantity - row.picked);
        if missing <= 0 {
            continue;
        }

        let index = match items.iter().position(|item| item.id == row.product_id) {
            Some(index) => index,
            None => {
                items.push(MissingItem {
                    id: row.product_id,
                    code: row.code.clone(),
                    product: row.product.clone(),
                    brand: row.brand.clone(),
                    barcode: row.barcode.clone(),
                    quantity: 0,
                    price: row.price,
                    orders: Vec::new(),
                });
                items.len() - 1
            }
        };
        let entry = &mut items[index];

        entry.quantity += missing;
        if !entry.orders.iter().any(|order| order.id == row.order_id) {
            entry.orders.push(MissingOrderRef {
                id: row.order_id,
                invoice_number: row.invoice_number.clone(),
                client_name: row.client_name.clone(),
            });
        }
    }

    items
}

fn partial_progress(rows: &[PartialOrderRow]) -> Vec<PartialOrderProgress> {
    rows.iter()
        .map(|row| PartialOrderProgress {
            id: row.id,
            invoice_number: row.invoice_number.clone(),
            client_name: row.client_name.clone(),
            created_at: row.created_at,
            missing_items: row.total_items - row.picked_items,
            total_items: row.total_items,
            progress: progress_percent(row.picked_items, row.total_items),
        })
        .collect()
}

fn performance_entries(rows: &[PerformanceRow]) -> Vec<PerformanceEntry> {
    rows.iter()
        .filter_map(|row| {
            let end_time = row.completed_at?;
            let duration = duration_minutes(row.created_at, end_time);
            Some(PerformanceEntry {
                id: row.id,
                invoice_number: row.invoice_number.clone(),
                client_name: row.client_name.clone(),
                start_time: row.created_at,
                end_time,
                duration,
                items_count: row.items_count,
                picked_items: row.picked_items,
                items_per_minute: items_per_minute(row.picked_items, duration),
            })
        })
        .collect()
}

/// Agrupa as ordens concluídas por dia (DD/MM), com o tempo médio de
/// separação por dia. Devolve os últimos 7 dias com dados.
fn chart_data(rows: &[PerformanceRow]) -> Vec<ChartEntry> {
    let mut by_day: BTreeMap<(u32, u32), (i64, i64)> = BTreeMap::new();

    for row in rows {
        let Some(completed_at) = row.completed_at else {
            continue;
        };
        let key = (completed_at.month(), completed_at.day());
        let duration = duration_minutes(row.created_at, completed_at);

        let slot = by_day.entry(key).or_insert((0, 0));
        slot.0 += duration;
        slot.1 += 1;
    }

    let entries: Vec<ChartEntry> = by_day
        .into_iter()
        .map(|((month, day), (total_time, order_count))| ChartEntry {
            fecha: format!("{day:02}/{month:02}"),
            tiempo_promedio: (total_time as f64 / order_count as f64).round() as i64,
            ordenes_completadas: order_count,
        })
        .collect();

    let skip = entries.len().saturating_sub(7);
    entries.into_iter().skip(skip).collect()
}

// --- Service ---

#[derive(Clone)]
pub struct ReportsService {
    reports_repo: ReportsRepository,
}

impl ReportsService {
    pub fn new(reports_repo: ReportsRepository) -> Self {
        Self { reports_repo }
    }

    pub async fn picking_stats<'e, E>(&self, executor: E) -> Result<PickingStats, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        self.reports_repo.get_stats(executor).await
    }

    pub async fn missing_items<'e, E>(
        &self,
        executor: E,
    ) -> Result<MissingItemsReport, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        // Snapshot consistente das duas leituras.
        let mut tx = executor.begin().await?;
        let item_rows = self.reports_repo.missing_item_rows(&mut *tx).await?;
        let order_rows = self.reports_repo.partial_order_rows(&mut *tx).await?;
        tx.commit().await?;

        let missing_items = aggregate_missing(&item_rows);

        let total_missing_items: i64 = missing_items.iter().map(|item| item.quantity).sum();
        let estimated_value: Decimal = missing_items
            .iter()
            .map(|item| item.price * Decimal::from(item.quantity))
            .sum();

        Ok(MissingItemsReport {
            partial_orders: partial_progress(&order_rows),
            stats: MissingStats {
                total_missing_items,
                total_partial_orders: order_rows.len() as i64,
                estimated_value,
            },
            missing_items,
        })
    }

    pub async fn performance<'e, E>(
        &self,
        executor: E,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        client_name: Option<&str>,
    ) -> Result<Vec<PerformanceEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = self
            .reports_repo
            .performance_rows(executor, start, end, client_name)
            .await?;
        Ok(performance_entries(&rows))
    }

    pub async fn performance_chart<'e, E>(&self, executor: E) -> Result<Vec<ChartEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = self
            .reports_repo
            .performance_rows(executor, None, None, None)
            .await?;
        Ok(chart_data(&rows))
    }

    pub async fn clients<'e, E>(&self, executor: E) -> Result<Vec<String>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.reports_repo.distinct_clients(executor).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::picking::OrderStatus;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn missing_row(
        order_id: Uuid,
        product_id: Uuid,
        quantity: i32,
        picked: i32,
        price: i64,
    ) -> MissingItemRow {
        MissingItemRow {
            order_id,
            invoice_number: format!("FAT-{order_id}"),
            client_name: "Cliente de Ejemplo".to_string(),
            product_id,
            code: "A2".to_string(),
            product: "KERATINA ORGANICA".to_string(),
            brand: "RITUAL-BOTANICO".to_string(),
            barcode: "7861234567890".to_string(),
            price: Decimal::from(price),
            quantity,
            picked,
        }
    }

    fn perf_row(
        created_minute: u32,
        completed_minute: Option<u32>,
        day: u32,
        picked: i64,
    ) -> PerformanceRow {
        PerformanceRow {
            id: Uuid::new_v4(),
            invoice_number: "RUM202505090921".to_string(),
            client_name: "Cliente de Ejemplo".to_string(),
            status: OrderStatus::Completed,
            created_at: Utc
                .with_ymd_and_hms(2026, 5, day, 10, created_minute, 0)
                .unwrap(),
            completed_at: completed_minute
                .map(|m| Utc.with_ymd_and_hms(2026, 5, day, 10, m, 0).unwrap()),
            items_count: picked,
            picked_items: picked,
        }
    }

    #[test]
    fn faltantes_somam_por_produto_e_deduplicam_ordens() {
        let product = Uuid::new_v4();
        let order_a = Uuid::new_v4();
        let order_b = Uuid::new_v4();

        // Duas ordens parciais, cada uma faltando 3 unidades do produto a 100.
        let rows = vec![
            missing_row(order_a, product, 5, 2, 100),
            missing_row(order_b, product, 3, 0, 100),
        ];

        let items = aggregate_missing(&rows);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 6);
        assert_eq!(items[0].orders.len(), 2);

        let value: Decimal = items
            .iter()
            .map(|item| item.price * Decimal::from(item.quantity))
            .sum();
        assert_eq!(value, Decimal::from(600));
    }

    #[test]
    fn faltantes_nao_repetem_a_mesma_ordem() {
        let product = Uuid::new_v4();
        let order = Uuid::new_v4();

        // Dois itens da mesma ordem apontando para o mesmo produto.
        let rows = vec![
            missing_row(order, product, 2, 1, 100),
            missing_row(order, product, 4, 1, 100),
        ];

        let items = aggregate_missing(&rows);
        assert_eq!(items[0].quantity, 4);
        assert_eq!(items[0].orders.len(), 1);
    }

    #[test]
    fn progresso_parcial_trata_ordem_sem_unidades() {
        let rows = vec![PartialOrderRow {
            id: Uuid::new_v4(),
            invoice_number: "X".to_string(),
            client_name: "C".to_string(),
            created_at: Utc::now(),
            total_items: 0,
            picked_items: 0,
        }];

        let progress = partial_progress(&rows);
        assert_eq!(progress[0].progress, 0);
        assert_eq!(progress[0].missing_items, 0);
    }

    #[test]
    fn duracao_arredonda_para_o_minuto_mais_proximo() {
        let start = Utc.with_ymd_and_hms(2026, 5, 9, 10, 0, 0).unwrap();
        // 90 segundos -> 2 minutos.
        let end = Utc.with_ymd_and_hms(2026, 5, 9, 10, 1, 30).unwrap();
        assert_eq!(duration_minutes(start, end), 2);

        // 29 segundos -> 0 minutos.
        let end = Utc.with_ymd_and_hms(2026, 5, 9, 10, 0, 29).unwrap();
        assert_eq!(duration_minutes(start, end), 0);
    }

    #[test]
    fn eficiencia_com_duracao_zero_e_zero() {
        assert_eq!(items_per_minute(10, 0), 0.0);
        assert_eq!(items_per_minute(7, 3), 2.33);
    }

    #[test]
    fn rendimento_calcula_duracao_e_eficiencia() {
        let rows = vec![perf_row(0, Some(30), 9, 60)];

        let entries = performance_entries(&rows);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].duration, 30);
        assert_eq!(entries[0].items_per_minute, 2.0);
    }

    #[test]
    fn grafico_agrupa_por_dia_e_limita_a_sete() {
        // Dez dias de ordens; o dia 9 tem duas ordens (20 e 40 min -> média 30).
        let mut rows: Vec<PerformanceRow> = (1..=10)
            .map(|day| perf_row(0, Some(10), day, 5))
            .collect();
        rows.push(perf_row(0, Some(20), 9, 5));
        rows.push(perf_row(0, Some(40), 9, 5));

        let chart = chart_data(&rows);
        assert_eq!(chart.len(), 7);
        assert_eq!(chart[0].fecha, "04/05");

        let day9 = chart.iter().find(|e| e.fecha == "09/05").unwrap();
        assert_eq!(day9.ordenes_completadas, 3);
        // (10 + 20 + 40) / 3 = 23,33 -> 23
        assert_eq!(day9.tiempo_promedio, 23);
    }
}
