//! Manager behaviour against a recording in-memory storage

use std::sync::Mutex;

use async_trait::async_trait;
use shared::models::{LineRefs, Order, OrderDetail, OrderQuery, OrderStatus, OrderUpdate};

use super::*;
use crate::orders::ManagerError;
use crate::orders::storage::{
    NewOrder, OrderPatch, OrderStorage, StorageError, StorageResult,
};

#[derive(Default)]
struct RecordingStorage {
    known_refs: bool,
    order: Mutex<Option<Order>>,
    created: Mutex<Vec<NewOrder>>,
    patches: Mutex<Vec<OrderPatch>>,
    deletes: Mutex<Vec<(i64, OrderStatus, bool)>>,
}

fn stored(status: OrderStatus) -> Order {
    Order {
        id: 1,
        owner_id: 10,
        address: "Sergeli".into(),
        latitude: None,
        longitude: None,
        date: 0,
        total_price: 100.0,
        payment_type: PaymentType::Payme,
        with_delivery: false,
        delivery_comment: None,
        paid: false,
        status,
        created_at: 0,
        updated_at: 0,
    }
}

#[async_trait]
impl OrderStorage for RecordingStorage {
    async fn refs_exist(&self, _refs: &LineRefs) -> StorageResult<bool> {
        Ok(self.known_refs)
    }

    async fn masters_exist(&self, _ids: &[i64]) -> StorageResult<bool> {
        Ok(true)
    }

    async fn create(&self, order: &NewOrder) -> StorageResult<i64> {
        self.created.lock().unwrap().push(order.clone());
        *self.order.lock().unwrap() = Some(stored(OrderStatus::Pending));
        Ok(1)
    }

    async fn find(&self, id: i64) -> StorageResult<Option<Order>> {
        Ok(self.order.lock().unwrap().clone().filter(|o| o.id == id))
    }

    async fn find_detail(&self, id: i64) -> StorageResult<Option<OrderDetail>> {
        Ok(self.find(id).await?.map(|order| OrderDetail {
            order,
            order_products: vec![],
            master_ids: vec![],
            owner: None,
        }))
    }

    async fn apply(&self, id: i64, patch: &OrderPatch) -> StorageResult<()> {
        let mut order = self.order.lock().unwrap();
        let order = order.as_mut().ok_or(StorageError::OrderNotFound(id))?;
        if let Some(change) = patch.status {
            if order.status != change.from {
                return Err(StorageError::StatusChanged(id));
            }
            order.status = change.to;
        }
        self.patches.lock().unwrap().push(patch.clone());
        Ok(())
    }

    async fn delete(&self, id: i64, expected: OrderStatus, release: bool) -> StorageResult<()> {
        self.deletes.lock().unwrap().push((id, expected, release));
        Ok(())
    }

    async fn list(
        &self,
        _query: &OrderQuery,
        _owner_id: Option<i64>,
    ) -> StorageResult<(Vec<Order>, i64)> {
        Ok((vec![], 0))
    }
}

#[tokio::test]
async fn test_rejected_input_never_reaches_storage() {
    let storage = Arc::new(RecordingStorage::default());
    let manager = OrderManager::new(storage.clone(), None);

    let err = manager
        .create(order_input(vec![tool_line(3, 1)]), 10)
        .await
        .unwrap_err();
    assert!(matches!(err, ManagerError::InvalidReferences));

    let mut bad = tool_line(3, 1);
    bad.working_time = Some(2);
    assert!(manager.create(order_input(vec![bad]), 10).await.is_err());

    assert!(storage.created.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_new_order_carries_input_verbatim() {
    let storage = Arc::new(RecordingStorage {
        known_refs: true,
        ..Default::default()
    });
    let manager = OrderManager::new(storage.clone(), None);

    let input = order_input(vec![tool_line(3, 2), profession_line(4, Some(5))]);
    let date = input.date.timestamp_millis();
    manager.create(input, 10).await.unwrap();

    let created = storage.created.lock().unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].owner_id, 10);
    assert_eq!(created[0].date, date);
    assert_eq!(created[0].products[1].price, 400.0);
    assert_eq!(created[0].tool_demand().unwrap(), vec![(3, 2)]);
}

#[tokio::test]
async fn test_release_flag_follows_lattice() {
    let storage = Arc::new(RecordingStorage::default());
    *storage.order.lock().unwrap() = Some(stored(OrderStatus::Accepted));
    let manager = OrderManager::new(storage.clone(), None);

    let accept_again = OrderUpdate {
        status: Some(OrderStatus::Accepted),
        ..Default::default()
    };
    manager.update(1, accept_again).await.unwrap();

    let complete = OrderUpdate {
        status: Some(OrderStatus::Completed),
        ..Default::default()
    };
    manager.update(1, complete).await.unwrap();

    let patches = storage.patches.lock().unwrap();
    assert_eq!(patches.len(), 2);
    assert!(patches[0].status.is_none());
    let change = patches[1].status.unwrap();
    assert_eq!(change.from, OrderStatus::Accepted);
    assert_eq!(change.to, OrderStatus::Completed);
    assert!(change.release);
}

#[tokio::test]
async fn test_remove_passes_expected_status() {
    let storage = Arc::new(RecordingStorage::default());
    *storage.order.lock().unwrap() = Some(stored(OrderStatus::Rejected));
    let manager = OrderManager::new(storage.clone(), None);

    manager.remove(1).await.unwrap();
    assert_eq!(
        storage.deletes.lock().unwrap().as_slice(),
        &[(1, OrderStatus::Rejected, false)]
    );
}

#[tokio::test]
async fn test_lost_race_is_a_conflict() {
    struct RacingStorage(RecordingStorage);

    #[async_trait]
    impl OrderStorage for RacingStorage {
        async fn refs_exist(&self, refs: &LineRefs) -> StorageResult<bool> {
            self.0.refs_exist(refs).await
        }
        async fn masters_exist(&self, ids: &[i64]) -> StorageResult<bool> {
            self.0.masters_exist(ids).await
        }
        async fn create(&self, order: &NewOrder) -> StorageResult<i64> {
            self.0.create(order).await
        }
        async fn find(&self, id: i64) -> StorageResult<Option<Order>> {
            self.0.find(id).await
        }
        async fn find_detail(&self, id: i64) -> StorageResult<Option<OrderDetail>> {
            self.0.find_detail(id).await
        }
        async fn apply(&self, id: i64, _patch: &OrderPatch) -> StorageResult<()> {
            Err(StorageError::StatusChanged(id))
        }
        async fn delete(&self, id: i64, expected: OrderStatus, release: bool) -> StorageResult<()> {
            self.0.delete(id, expected, release).await
        }
        async fn list(
            &self,
            query: &OrderQuery,
            owner_id: Option<i64>,
        ) -> StorageResult<(Vec<Order>, i64)> {
            self.0.list(query, owner_id).await
        }
    }

    let inner = RecordingStorage::default();
    *inner.order.lock().unwrap() = Some(stored(OrderStatus::Pending));
    let manager = OrderManager::new(Arc::new(RacingStorage(inner)), None);

    let cancel = OrderUpdate {
        status: Some(OrderStatus::Cancelled),
        ..Default::default()
    };
    let err = manager.update(1, cancel).await.unwrap_err();
    assert!(matches!(err, ManagerError::ConcurrentModification(1)));
    let app: shared::error::AppError = err.into();
    assert_eq!(app.http_status(), http::StatusCode::CONFLICT);
}
