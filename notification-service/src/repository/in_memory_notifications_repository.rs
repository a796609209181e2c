use super::{Error, NotificationsRepository};
use crate::dto::{NewNotification, Notification};
use async_trait::async_trait;
use std::sync::Mutex;
use time::OffsetDateTime;

///
/// Repository keeping notifications in memory, used by tests
/// that exercise the whole request path.
///
#[derive(Default)]
pub struct InMemoryNotificationsRepository {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    last_id: i64,
    notifications: Vec<Notification>,
}

#[async_trait]
impl NotificationsRepository for InMemoryNotificationsRepository {
    async fn create(&self, notification: NewNotification) -> Result<i64, Error> {
        let mut state = self.state.lock().unwrap();
        state.last_id += 1;
        let id = state.last_id;
        state.notifications.push(Notification {
            id,
            user_id: notification.user_id,
            notification_type: notification.notification_type,
            is_read: false,
            created_at: notification
                .created_at
                .unwrap_or_else(OffsetDateTime::now_utc),
            payload: notification.payload,
        });

        Ok(id)
    }

    async fn get_by_id(&self, id: i64) -> Result<Notification, Error> {
        let state = self.state.lock().unwrap();
        state
            .notifications
            .iter()
            .find(|notification| notification.id == id)
            .cloned()
            .ok_or(Error::NotificationNotFound)
    }

    async fn list_by_user(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Notification>, i64), Error> {
        let state = self.state.lock().unwrap();
        let mut notifications = state
            .notifications
            .iter()
            .filter(|notification| notification.user_id == user_id)
            .cloned()
            .collect::<Vec<_>>();
        notifications.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));

        let total = notifications.len() as i64;
        let page = notifications
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();

        Ok((page, total))
    }

    async fn mark_as_read(&self, id: i64) -> Result<(), Error> {
        let mut state = self.state.lock().unwrap();
        let notification = state
            .notifications
            .iter_mut()
            .find(|notification| notification.id == id)
            .ok_or(Error::NotificationNotFound)?;
        notification.is_read = true;

        Ok(())
    }

    async fn mark_all_as_read(&self, user_id: i64) -> Result<u64, Error> {
        let mut state = self.state.lock().unwrap();
        let mut updated = 0;
        for notification in state
            .notifications
            .iter_mut()
            .filter(|notification| notification.user_id == user_id && !notification.is_read)
        {
            notification.is_read = true;
            updated += 1;
        }

        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<(), Error> {
        let mut state = self.state.lock().unwrap();
        let len_before = state.notifications.len();
        state.notifications.retain(|notification| notification.id != id);

        match state.notifications.len() == len_before {
            true => Err(Error::NotificationNotFound),
            false => Ok(()),
        }
    }

    async fn count_unread(&self, user_id: i64) -> Result<i64, Error> {
        let state = self.state.lock().unwrap();
        let count = state
            .notifications
            .iter()
            .filter(|notification| notification.user_id == user_id && !notification.is_read)
            .count();

        Ok(count as i64)
    }
}
