//! MongoDB 저장소
//!
//! 첫 [`Store::connect`] 호출에서 연결하고 인덱스를 만든 뒤 연결을 재사용합니다.
//! 연결에 실패하면 캐시하지 않으므로 다음 요청에서 다시 시도합니다.
//!
//! ## 컬렉션
//!
//! | 컬렉션 | 유니크 인덱스 |
//! |--------|---------------|
//! | `accounts` | `id` |
//! | `auths` | `id`, `loginfo.email` (EMAIL 한정), `(auth_kind, loginfo.user_id)` |
//! | `profiles` | `id`, `nickname` |
//! | `boards` | `id`, `seq` |
//! | `counters` | 게시글 `seq` 발급용 |
//!
//! 엔티티의 `id` 필드가 식별자이며 MongoDB 의 `_id` 는 사용하지 않습니다.
//! 시각은 epoch milliseconds(Int64) 로 저장됩니다.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use log::{info, warn};
use mongodb::bson::{doc, Document};
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use mongodb::options::{IndexOptions, ReturnDocument};
use mongodb::{Collection, IndexModel};
use tokio::sync::OnceCell;

use super::{
    AccountOrderKey, AccountRepository, AuthRepository, BoardPage, BoardQuery, BoardRepository,
    Connection, ProfileRepository, Store, StoreError,
};
use crate::db::Database;
use crate::domain::catalog::{AuthKind, OrderType};
use crate::domain::entities::{now, Account, Auth, Board, NewBoard, Profile};

const DUPLICATE_KEY: i32 = 11000;

fn query_error(error: MongoError) -> StoreError {
    StoreError::Query(error.to_string())
}

fn is_duplicate_key(error: &MongoError) -> bool {
    matches!(
        error.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(failure)) if failure.code == DUPLICATE_KEY
    )
}

/// 중복 키 에러는 `Conflict(message)` 로, 나머지는 `Query` 로 변환
fn write_error(error: MongoError, message: impl FnOnce() -> String) -> StoreError {
    if is_duplicate_key(&error) {
        StoreError::Conflict(message())
    } else {
        query_error(error)
    }
}

fn unique(keys: Document, name: &str) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(true).name(name.to_string()).build())
        .build()
}

fn unique_partial(keys: Document, name: &str, filter: Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(
            IndexOptions::builder()
                .unique(true)
                .name(name.to_string())
                .partial_filter_expression(filter)
                .build(),
        )
        .build()
}

pub struct MongoStore {
    connection: OnceCell<Arc<MongoConnection>>,
}

impl Default for MongoStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MongoStore {
    /// `DatabaseConfig` 의 URI 와 데이터베이스 이름을 사용
    pub fn new() -> Self {
        Self {
            connection: OnceCell::new(),
        }
    }

    async fn open(&self) -> Result<Arc<MongoConnection>, StoreError> {
        let database = Database::connect().await?;

        let connection = MongoConnection::new(database.get_database());
        connection.create_indexes().await?;
        info!("📇 MongoDB 인덱스 준비 완료: {}", database.database_name());

        Ok(Arc::new(connection))
    }
}

#[async_trait]
impl Store for MongoStore {
    async fn connect(&self) -> Result<Arc<dyn Connection>, StoreError> {
        let connection = self
            .connection
            .get_or_try_init(|| self.open())
            .await
            .inspect_err(|e| warn!("MongoDB 연결 실패: {}", e))?;

        let connection: Arc<dyn Connection> = connection.clone();
        Ok(connection)
    }
}

/// 연결된 데이터베이스 핸들 (모든 repository trait 구현)
pub struct MongoConnection {
    accounts: Collection<Account>,
    auths: Collection<Auth>,
    profiles: Collection<Profile>,
    boards: Collection<Board>,
    counters: Collection<Document>,
}

impl MongoConnection {
    pub fn new(database: mongodb::Database) -> Self {
        Self {
            accounts: database.collection("accounts"),
            auths: database.collection("auths"),
            profiles: database.collection("profiles"),
            boards: database.collection("boards"),
            counters: database.collection("counters"),
        }
    }

    pub async fn create_indexes(&self) -> Result<(), StoreError> {
        self.accounts
            .create_indexes([unique(doc! { "id": 1 }, "id_unique")])
            .await
            .map_err(query_error)?;

        self.auths
            .create_indexes([
                unique(doc! { "id": 1 }, "id_unique"),
                unique_partial(
                    doc! { "loginfo.email": 1 },
                    "email_unique",
                    doc! { "auth_kind": AuthKind::Email.as_str() },
                ),
                unique_partial(
                    doc! { "auth_kind": 1, "loginfo.user_id": 1 },
                    "social_user_unique",
                    doc! { "loginfo.user_id": { "$exists": true } },
                ),
            ])
            .await
            .map_err(query_error)?;

        self.profiles
            .create_indexes([
                unique(doc! { "id": 1 }, "id_unique"),
                unique(doc! { "nickname": 1 }, "nickname_unique"),
            ])
            .await
            .map_err(query_error)?;

        let page_index = IndexModel::builder()
            .keys(doc! { "created_at": -1, "seq": -1 })
            .options(IndexOptions::builder().name("created_at_seq".to_string()).build())
            .build();

        self.boards
            .create_indexes([
                unique(doc! { "id": 1 }, "id_unique"),
                unique(doc! { "seq": 1 }, "seq_unique"),
                page_index,
            ])
            .await
            .map_err(query_error)?;

        Ok(())
    }

    async fn next_board_seq(&self) -> Result<i64, StoreError> {
        let counter = self
            .counters
            .find_one_and_update(doc! { "_id": "boards" }, doc! { "$inc": { "seq": 1_i64 } })
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await
            .map_err(query_error)?
            .ok_or_else(|| StoreError::Query("board sequence counter is missing".to_string()))?;

        counter
            .get_i64("seq")
            .map_err(|e| StoreError::Query(e.to_string()))
    }
}

impl Connection for MongoConnection {
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

fn auth_conflict(auth: &Auth) -> String {
    match &auth.loginfo.email {
        Some(email) if auth.auth_kind == AuthKind::Email => format!("'{}' already exists.", email),
        _ => format!("'{}' auth for this user already exists.", auth.auth_kind),
    }
}

#[async_trait]
impl AccountRepository for MongoConnection {
    async fn find_by_id(&self, id: &str) -> Result<Option<Account>, StoreError> {
        self.accounts
            .find_one(doc! { "id": id })
            .await
            .map_err(query_error)
    }

    async fn find_active_by_ids(
        &self,
        ids: &[String],
        order_key: AccountOrderKey,
        order_type: OrderType,
    ) -> Result<Vec<Account>, StoreError> {
        let mut sort = Document::new();
        sort.insert(order_key.field(), order_type.direction());

        self.accounts
            .find(doc! { "id": { "$in": ids.to_vec() }, "is_active": true })
            .sort(sort)
            .await
            .map_err(query_error)?
            .try_collect()
            .await
            .map_err(query_error)
    }

    async fn create_with_auth(&self, account: &Account, auth: &Auth) -> Result<(), StoreError> {
        self.accounts
            .insert_one(account)
            .await
            .map_err(|e| write_error(e, || format!("'{}' already exists.", account.id)))?;

        if let Err(e) = self.auths.insert_one(auth).await {
            if let Err(cleanup) = self.accounts.delete_one(doc! { "id": &account.id }).await {
                warn!("계정 '{}' 정리 실패: {}", account.id, cleanup);
            }
            return Err(write_error(e, || auth_conflict(auth)));
        }

        Ok(())
    }

    async fn save(&self, account: &Account) -> Result<(), StoreError> {
        self.accounts
            .replace_one(doc! { "id": &account.id }, account)
            .upsert(true)
            .await
            .map_err(query_error)?;
        Ok(())
    }
}

#[async_trait]
impl AuthRepository for MongoConnection {
    async fn find_by_email(&self, email: &str) -> Result<Option<Auth>, StoreError> {
        self.auths
            .find_one(doc! { "auth_kind": AuthKind::Email.as_str(), "loginfo.email": email })
            .await
            .map_err(query_error)
    }

    async fn find_social(&self, kind: AuthKind, user_id: &str) -> Result<Option<Auth>, StoreError> {
        self.auths
            .find_one(doc! { "auth_kind": kind.as_str(), "loginfo.user_id": user_id })
            .await
            .map_err(query_error)
    }

    async fn save(&self, auth: &Auth) -> Result<(), StoreError> {
        self.auths
            .replace_one(doc! { "id": &auth.id }, auth)
            .upsert(true)
            .await
            .map_err(|e| write_error(e, || auth_conflict(auth)))?;
        Ok(())
    }
}

#[async_trait]
impl ProfileRepository for MongoConnection {
    async fn find_active(&self, id: &str) -> Result<Option<Profile>, StoreError> {
        self.profiles
            .find_one(doc! { "id": id, "is_active": true })
            .await
            .map_err(query_error)
    }

    async fn find_by_nickname(&self, nickname: &str) -> Result<Option<Profile>, StoreError> {
        self.profiles
            .find_one(doc! { "nickname": nickname })
            .await
            .map_err(query_error)
    }

    async fn find_active_by_account(&self, account_id: &str) -> Result<Vec<Profile>, StoreError> {
        self.profiles
            .find(doc! { "account_id": account_id, "is_active": true })
            .await
            .map_err(query_error)?
            .try_collect()
            .await
            .map_err(query_error)
    }

    async fn create(&self, profile: &Profile) -> Result<(), StoreError> {
        self.profiles
            .insert_one(profile)
            .await
            .map_err(|e| write_error(e, || format!("Nickname '{}' already exists.", profile.nickname)))?;
        Ok(())
    }

    async fn save(&self, profile: &Profile) -> Result<(), StoreError> {
        self.profiles
            .replace_one(doc! { "id": &profile.id }, profile)
            .upsert(true)
            .await
            .map_err(|e| write_error(e, || format!("Nickname '{}' already exists.", profile.nickname)))?;
        Ok(())
    }

    async fn deactivate_by_account(&self, account_id: &str) -> Result<u64, StoreError> {
        let result = self
            .profiles
            .update_many(
                doc! { "account_id": account_id, "is_active": true },
                doc! { "$set": { "is_active": false, "updated_at": now().timestamp_millis() } },
            )
            .await
            .map_err(query_error)?;
        Ok(result.modified_count)
    }
}

fn board_filter(query: &BoardQuery) -> Document {
    let mut filter = Document::new();
    if let Some(created_by) = &query.filter.created_by {
        filter.insert("created_by", created_by.as_str());
    }
    if let Some(category) = query.filter.category {
        filter.insert("category", category.as_str());
    }
    filter
}

/// `(created_at, seq)` 가 커서 뒤에 오는 행만 남기는 조건
fn cursor_filter(query: &BoardQuery) -> Option<Document> {
    let cursor = query.after?;
    let operator = match query.order {
        OrderType::Asc => "$gt",
        OrderType::Desc => "$lt",
    };

    let mut created_at = Document::new();
    created_at.insert(operator, cursor.created_at);
    let mut seq = Document::new();
    seq.insert(operator, cursor.seq);

    Some(doc! {
        "$or": [
            { "created_at": created_at },
            { "created_at": cursor.created_at, "seq": seq },
        ]
    })
}

#[async_trait]
impl BoardRepository for MongoConnection {
    async fn find_by_id(&self, id: &str) -> Result<Option<Board>, StoreError> {
        self.boards
            .find_one(doc! { "id": id })
            .await
            .map_err(query_error)
    }

    async fn create(&self, board: NewBoard) -> Result<Board, StoreError> {
        let seq = self.next_board_seq().await?;
        let board = board.into_board(seq);

        self.boards
            .insert_one(&board)
            .await
            .map_err(|e| write_error(e, || format!("'{}' already exists.", board.id)))?;

        Ok(board)
    }

    async fn save(&self, board: &Board) -> Result<(), StoreError> {
        self.boards
            .replace_one(doc! { "id": &board.id }, board)
            .upsert(true)
            .await
            .map_err(query_error)?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let result = self
            .boards
            .delete_one(doc! { "id": id })
            .await
            .map_err(query_error)?;
        Ok(result.deleted_count > 0)
    }

    async fn page(&self, query: &BoardQuery) -> Result<BoardPage, StoreError> {
        let filter = board_filter(query);
        let count = self
            .boards
            .count_documents(filter.clone())
            .await
            .map_err(query_error)?;

        let filter = match cursor_filter(query) {
            Some(after) => doc! { "$and": [filter, after] },
            None => filter,
        };

        let direction = query.order.direction();
        let mut rows: Vec<Board> = self
            .boards
            .find(filter)
            .sort(doc! { "created_at": direction, "seq": direction })
            .limit(i64::try_from(query.limit.saturating_add(1)).unwrap_or(i64::MAX))
            .await
            .map_err(query_error)?
            .try_collect()
            .await
            .map_err(query_error)?;

        let has_more = rows.len() > query.limit;
        rows.truncate(query.limit);

        Ok(BoardPage {
            boards: rows,
            count,
            has_more,
        })
    }
}
