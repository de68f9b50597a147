//! 인메모리 저장소
//!
//! MongoDB 구현과 같은 유일성 제약을 지키는 `HashMap` 기반 저장소입니다.
//! `STORE_BACKEND=memory` 로 로컬 실행하거나 테스트에서 사용합니다.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{
    AccountOrderKey, AccountRepository, AuthRepository, BoardPage, BoardQuery, BoardRepository,
    Connection, ProfileRepository, Store, StoreError,
};
use crate::domain::catalog::{AuthKind, OrderType};
use crate::domain::entities::{Account, Auth, Board, NewBoard, Profile};

#[derive(Default)]
struct Tables {
    accounts: HashMap<String, Account>,
    auths: HashMap<String, Auth>,
    profiles: HashMap<String, Profile>,
    boards: HashMap<String, Board>,
    board_seq: i64,
}

impl Tables {
    fn email_taken(&self, auth: &Auth) -> bool {
        auth.auth_kind == AuthKind::Email
            && self.auths.values().any(|other| {
                other.id != auth.id
                    && other.auth_kind == AuthKind::Email
                    && other.loginfo.email == auth.loginfo.email
            })
    }

    fn social_taken(&self, auth: &Auth) -> bool {
        auth.auth_kind.is_social()
            && self.auths.values().any(|other| {
                other.id != auth.id
                    && other.auth_kind == auth.auth_kind
                    && other.loginfo.user_id == auth.loginfo.user_id
            })
    }

    fn nickname_taken(&self, profile: &Profile) -> bool {
        self.profiles
            .values()
            .any(|other| other.id != profile.id && other.nickname == profile.nickname)
    }
}

/// 연결 핸들 (모든 repository trait 구현)
#[derive(Default)]
pub struct MemoryConnection {
    tables: RwLock<Tables>,
}

#[derive(Clone)]
pub struct MemoryStore {
    connection: Arc<MemoryConnection>,
    available: Arc<AtomicBool>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            connection: Arc::new(MemoryConnection::default()),
            available: Arc::new(AtomicBool::new(true)),
        }
    }

    /// `false` 이면 이후 `connect` 가 실패합니다.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn connect(&self) -> Result<Arc<dyn Connection>, StoreError> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store is offline".to_string()));
        }
        let connection: Arc<dyn Connection> = self.connection.clone();
        Ok(connection)
    }
}

impl Connection for MemoryConnection {
    fn accounts(&self) -> &dyn AccountRepository {
        self
    }

    fn auths(&self) -> &dyn AuthRepository {
        self
    }

    fn profiles(&self) -> &dyn ProfileRepository {
        self
    }

    fn boards(&self) -> &dyn BoardRepository {
        self
    }
}

#[async_trait]
impl AccountRepository for MemoryConnection {
    async fn find_by_id(&self, id: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.tables.read().await.accounts.get(id).cloned())
    }

    async fn find_active_by_ids(
        &self,
        ids: &[String],
        order_key: AccountOrderKey,
        order_type: OrderType,
    ) -> Result<Vec<Account>, StoreError> {
        let tables = self.tables.read().await;
        let mut accounts: Vec<Account> = ids
            .iter()
            .filter_map(|id| tables.accounts.get(id))
            .filter(|account| account.is_active)
            .cloned()
            .collect();

        accounts.sort_by_key(|account| match order_key {
            AccountOrderKey::CreatedAt => account.created_at,
            AccountOrderKey::UpdatedAt => account.updated_at,
        });
        if order_type == OrderType::Desc {
            accounts.reverse();
        }
        Ok(accounts)
    }

    async fn create_with_auth(&self, account: &Account, auth: &Auth) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.email_taken(auth) {
            let email = auth.loginfo.email.clone().unwrap_or_default();
            return Err(StoreError::Conflict(format!("'{}' already exists.", email)));
        }
        if tables.social_taken(auth) {
            return Err(StoreError::Conflict(format!(
                "'{}' auth for this user already exists.",
                auth.auth_kind
            )));
        }
        tables.accounts.insert(account.id.clone(), account.clone());
        tables.auths.insert(auth.id.clone(), auth.clone());
        Ok(())
    }

    async fn save(&self, account: &Account) -> Result<(), StoreError> {
        self.tables
            .write()
            .await
            .accounts
            .insert(account.id.clone(), account.clone());
        Ok(())
    }
}

#[async_trait]
impl AuthRepository for MemoryConnection {
    async fn find_by_email(&self, email: &str) -> Result<Option<Auth>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .auths
            .values()
            .find(|auth| auth.auth_kind == AuthKind::Email && auth.loginfo.email.as_deref() == Some(email))
            .cloned())
    }

    async fn find_social(&self, kind: AuthKind, user_id: &str) -> Result<Option<Auth>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .auths
            .values()
            .find(|auth| auth.auth_kind == kind && auth.loginfo.user_id.as_deref() == Some(user_id))
            .cloned())
    }

    async fn save(&self, auth: &Auth) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.email_taken(auth) || tables.social_taken(auth) {
            return Err(StoreError::Conflict("Auth already exists.".to_string()));
        }
        tables.auths.insert(auth.id.clone(), auth.clone());
        Ok(())
    }
}

#[async_trait]
impl ProfileRepository for MemoryConnection {
    async fn find_active(&self, id: &str) -> Result<Option<Profile>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.profiles.get(id).filter(|profile| profile.is_active).cloned())
    }

    async fn find_by_nickname(&self, nickname: &str) -> Result<Option<Profile>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .profiles
            .values()
            .find(|profile| profile.nickname == nickname)
            .cloned())
    }

    async fn find_active_by_account(&self, account_id: &str) -> Result<Vec<Profile>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .profiles
            .values()
            .filter(|profile| profile.is_active && profile.account_id == account_id)
            .cloned()
            .collect())
    }

    async fn create(&self, profile: &Profile) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.nickname_taken(profile) {
            return Err(StoreError::Conflict(format!(
                "Nickname '{}' already exists.",
                profile.nickname
            )));
        }
        tables.profiles.insert(profile.id.clone(), profile.clone());
        Ok(())
    }

    async fn save(&self, profile: &Profile) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.nickname_taken(profile) {
            return Err(StoreError::Conflict(format!(
                "Nickname '{}' already exists.",
                profile.nickname
            )));
        }
        tables.profiles.insert(profile.id.clone(), profile.clone());
        Ok(())
    }

    async fn deactivate_by_account(&self, account_id: &str) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().await;
        let mut changed = 0;
        for profile in tables.profiles.values_mut() {
            if profile.account_id == account_id && profile.is_active {
                profile.is_active = false;
                profile.updated_at = crate::domain::entities::now();
                changed += 1;
            }
        }
        Ok(changed)
    }
}

#[async_trait]
impl BoardRepository for MemoryConnection {
    async fn find_by_id(&self, id: &str) -> Result<Option<Board>, StoreError> {
        Ok(self.tables.read().await.boards.get(id).cloned())
    }

    async fn create(&self, board: NewBoard) -> Result<Board, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.boards.contains_key(&board.id) {
            return Err(StoreError::Conflict(format!("'{}' already exists.", board.id)));
        }
        tables.board_seq += 1;
        let board = board.into_board(tables.board_seq);
        tables.boards.insert(board.id.clone(), board.clone());
        Ok(board)
    }

    async fn save(&self, board: &Board) -> Result<(), StoreError> {
        self.tables
            .write()
            .await
            .boards
            .insert(board.id.clone(), board.clone());
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.tables.write().await.boards.remove(id).is_some())
    }

    async fn page(&self, query: &BoardQuery) -> Result<BoardPage, StoreError> {
        let tables = self.tables.read().await;
        let mut matching: Vec<&Board> = tables
            .boards
            .values()
            .filter(|board| query.filter.matches(board))
            .collect();
        let count = matching.len() as u64;

        matching.sort_by_key(|board| (board.created_at.timestamp_millis(), board.seq));
        if query.order == OrderType::Desc {
            matching.reverse();
        }

        let mut rows: Vec<Board> = matching
            .into_iter()
            .filter(|board| query.after.is_none_or(|cursor| cursor.precedes(board, query.order)))
            .take(query.limit.saturating_add(1))
            .cloned()
            .collect();

        let has_more = rows.len() > query.limit;
        rows.truncate(query.limit);

        Ok(BoardPage {
            boards: rows,
            count,
            has_more,
        })
    }
}
