//! User profiles, follows, favorite places and event attendance.

use crate::domain::{PlaceId, TelegramId};
use crate::error::ExplorerError;
use crate::persistence::models::{NewUser, PlaceRow, UserChanges, UserRow};
use crate::persistence::{Direction, PostgresPersistence};

/// Both directions of the follow relation for one user.
#[derive(Debug, Clone)]
pub struct FollowGraph {
    /// Users this user follows.
    pub subscriptions: Vec<UserRow>,
    /// Users following this user.
    pub subscribers: Vec<UserRow>,
}

/// Orchestrates user-centric reads and writes.
///
/// Every association write first confirms that the owning user exists so
/// that a missing user is reported as such rather than as a foreign-key
/// failure on some other column.
#[derive(Debug, Clone)]
pub struct UserService {
    store: PostgresPersistence,
}

impl UserService {
    /// Creates a new `UserService`.
    #[must_use]
    pub fn new(store: PostgresPersistence) -> Self {
        Self { store }
    }

    async fn require_user(&self, telegram_id: &TelegramId) -> Result<(), ExplorerError> {
        if self.store.user_exists(telegram_id).await? {
            Ok(())
        } else {
            Err(ExplorerError::not_found("user", telegram_id))
        }
    }

    /// All users.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::Empty`] when there are none.
    pub async fn list(&self) -> Result<Vec<UserRow>, ExplorerError> {
        let users = self.store.list_users().await?;
        if users.is_empty() {
            return Err(ExplorerError::Empty("users"));
        }
        Ok(users)
    }

    /// One user.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::NotFound`] if the user does not exist.
    pub async fn get(&self, telegram_id: &TelegramId) -> Result<UserRow, ExplorerError> {
        self.store
            .find_user(telegram_id)
            .await?
            .ok_or_else(|| ExplorerError::not_found("user", telegram_id))
    }

    /// Registers a user.
    ///
    /// # Errors
    ///
    /// A telegram id that is already registered surfaces as
    /// [`ExplorerError::Conflict`].
    pub async fn create(&self, user: &NewUser) -> Result<UserRow, ExplorerError> {
        let row = self.store.insert_user(user).await?;
        tracing::info!(telegram_id = %row.telegram_id, "user created");
        Ok(row)
    }

    /// Replaces profile fields.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::NotFound`] if the user does not exist.
    pub async fn update(
        &self,
        telegram_id: &TelegramId,
        changes: &UserChanges,
    ) -> Result<UserRow, ExplorerError> {
        let row = self
            .store
            .update_user(telegram_id, changes)
            .await?
            .ok_or_else(|| ExplorerError::not_found("user", telegram_id))?;
        tracing::info!(%telegram_id, "user updated");
        Ok(row)
    }

    // ── Follows ─────────────────────────────────────────────────────────

    /// Who the user follows and who follows the user.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::NotFound`] if the user does not exist.
    pub async fn follows(&self, telegram_id: &TelegramId) -> Result<FollowGraph, ExplorerError> {
        self.require_user(telegram_id).await?;
        let subscriptions = self
            .store
            .related_users(telegram_id, Direction::Forward)
            .await?;
        let subscribers = self
            .store
            .related_users(telegram_id, Direction::Inverse)
            .await?;
        Ok(FollowGraph {
            subscriptions,
            subscribers,
        })
    }

    /// Makes `subscriber` follow `target`.
    ///
    /// # Errors
    ///
    /// Self-subscription is [`ExplorerError::InvalidRequest`]; an unknown
    /// user on either side is [`ExplorerError::NotFound`]; an existing
    /// follow is [`ExplorerError::Conflict`].
    pub async fn subscribe(
        &self,
        subscriber: &TelegramId,
        target: &TelegramId,
    ) -> Result<UserRow, ExplorerError> {
        if subscriber == target {
            return Err(ExplorerError::InvalidRequest(
                "a user cannot subscribe to itself".to_string(),
            ));
        }
        self.require_user(subscriber).await?;
        let target_row = self.get(target).await?;
        self.store.subscribe_user(subscriber, target).await?;
        tracing::info!(%subscriber, %target, "subscription created");
        Ok(target_row)
    }

    /// Removes a follow.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::NotFound`] if the follow does not exist.
    pub async fn unsubscribe(
        &self,
        subscriber: &TelegramId,
        target: &TelegramId,
    ) -> Result<(), ExplorerError> {
        if !self.store.unsubscribe_user(subscriber, target).await? {
            return Err(ExplorerError::not_found(
                "subscription",
                format!("{subscriber} -> {target}"),
            ));
        }
        tracing::info!(%subscriber, %target, "subscription removed");
        Ok(())
    }

    // ── Favorite places ─────────────────────────────────────────────────

    /// The user's favorite places.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::NotFound`] if the user does not exist.
    pub async fn favorite_places(
        &self,
        telegram_id: &TelegramId,
    ) -> Result<Vec<PlaceRow>, ExplorerError> {
        self.require_user(telegram_id).await?;
        self.store.favorite_places(telegram_id).await
    }

    /// Favorites a place, creating its local row on first reference.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::NotFound`] for an unknown user and
    /// [`ExplorerError::Conflict`] if the place is already a favorite.
    pub async fn add_favorite_place(
        &self,
        telegram_id: &TelegramId,
        place_id: PlaceId,
        name: Option<&str>,
    ) -> Result<PlaceRow, ExplorerError> {
        self.require_user(telegram_id).await?;
        let place = self
            .store
            .add_favorite_place(telegram_id, &place_id.to_string(), name)
            .await?;
        tracing::info!(%telegram_id, %place_id, "favorite place added");
        Ok(place)
    }

    /// Removes exactly the `(user, place)` favorite.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::NotFound`] if that favorite does not exist.
    pub async fn remove_favorite_place(
        &self,
        telegram_id: &TelegramId,
        place_id: PlaceId,
    ) -> Result<(), ExplorerError> {
        let removed = self
            .store
            .remove_favorite_place(telegram_id, &place_id.to_string())
            .await?;
        if !removed {
            return Err(ExplorerError::not_found(
                "favorite place",
                format!("{telegram_id} -> {place_id}"),
            ));
        }
        tracing::info!(%telegram_id, %place_id, "favorite place removed");
        Ok(())
    }

    // ── Attendance ──────────────────────────────────────────────────────

    /// Records that the user attends the event.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::NotFound`] for an unknown user or event and
    /// [`ExplorerError::Conflict`] if already attending.
    pub async fn attend_event(
        &self,
        telegram_id: &TelegramId,
        event_id: i32,
    ) -> Result<(), ExplorerError> {
        self.require_user(telegram_id).await?;
        if self.store.find_event(event_id).await?.is_none() {
            return Err(ExplorerError::not_found("event", event_id));
        }
        self.store.add_participant(telegram_id, event_id).await?;
        tracing::info!(%telegram_id, event_id, "event participation added");
        Ok(())
    }
}
