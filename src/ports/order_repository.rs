//! Order repository port.
//!
//! Defines the contract for persisting and querying orders, plus the paging
//! and sorting vocabulary the listing operations share.
//!
//! # Design
//!
//! - **Owner-aware lookups**: the `*_and_owner` variants let the store do the
//!   scope filtering, so an out-of-scope record is never loaded into memory.
//! - **Case-insensitive product match**: product filters compare without
//!   regard to case in every implementation.
//! - **Upsert save**: saving an order that carries an id overwrites the
//!   stored row, or recreates it if it was deleted in the meantime.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::foundation::{DomainError, OrderId, ValidationError};
use crate::domain::order::Order;

/// Page size used when the caller does not supply one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page a caller may request.
pub const MAX_PAGE_SIZE: u32 = 2000;

/// Repository port for order persistence.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Find an order by id.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, DomainError>;

    /// Find an order by id, only if it belongs to `owner`.
    async fn find_by_id_and_owner(
        &self,
        id: OrderId,
        owner: &str,
    ) -> Result<Option<Order>, DomainError>;

    /// Check if an order exists.
    async fn exists_by_id(&self, id: OrderId) -> Result<bool, DomainError>;

    /// Check if an order exists and belongs to `owner`.
    async fn exists_by_id_and_owner(&self, id: OrderId, owner: &str)
        -> Result<bool, DomainError>;

    /// List every order.
    async fn find_all(&self, page: &PageRequest) -> Result<Page<Order>, DomainError>;

    /// List the orders of one owner.
    async fn find_by_owner(
        &self,
        owner: &str,
        page: &PageRequest,
    ) -> Result<Page<Order>, DomainError>;

    /// List orders whose product equals `product`, ignoring case.
    async fn find_by_product(
        &self,
        product: &str,
        page: &PageRequest,
    ) -> Result<Page<Order>, DomainError>;

    /// List the orders of one owner whose product equals `product`, ignoring case.
    async fn find_by_owner_and_product(
        &self,
        owner: &str,
        product: &str,
        page: &PageRequest,
    ) -> Result<Page<Order>, DomainError>;

    /// Persist an order and return it with its id.
    ///
    /// Orders without an id are inserted under a fresh id. Orders with an id
    /// are written under that id whether or not a row still exists.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn save(&self, order: Order) -> Result<Order, DomainError>;

    /// Delete an order. Deleting an absent id is not an error.
    async fn delete_by_id(&self, id: OrderId) -> Result<(), DomainError>;
}

/// Order property a listing can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Id,
    Amount,
    Owner,
    Product,
    Quantity,
}

impl SortField {
    /// Property name as it appears in query strings and as the column name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Amount => "amount",
            SortField::Owner => "owner",
            SortField::Product => "product",
            SortField::Quantity => "quantity",
        }
    }
}

impl FromStr for SortField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "id" => Ok(SortField::Id),
            "amount" => Ok(SortField::Amount),
            "owner" => Ok(SortField::Owner),
            "product" => Ok(SortField::Product),
            "quantity" => Ok(SortField::Quantity),
            other => Err(ValidationError::invalid_format(
                "sort",
                format!("unknown property '{}'", other),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(ValidationError::invalid_format(
                "sort",
                format!("unknown direction '{}'", other),
            )),
        }
    }
}

/// One sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub field: SortField,
    pub direction: SortDirection,
}

/// Ordered list of sort keys; earlier keys take precedence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    orders: Vec<SortOrder>,
}

impl Sort {
    pub fn by(field: SortField, direction: SortDirection) -> Self {
        Self {
            orders: vec![SortOrder { field, direction }],
        }
    }

    pub fn orders(&self) -> &[SortOrder] {
        &self.orders
    }

    /// Parses one `property[,direction]` query parameter, e.g. `amount,desc`.
    ///
    /// A missing direction means ascending.
    pub fn parse_param(param: &str) -> Result<SortOrder, ValidationError> {
        let mut parts = param.split(',');
        let field = parts.next().unwrap_or_default().parse::<SortField>()?;
        let direction = match parts.next() {
            Some(dir) if !dir.trim().is_empty() => dir.parse::<SortDirection>()?,
            _ => SortDirection::Asc,
        };
        if parts.next().is_some() {
            return Err(ValidationError::invalid_format(
                "sort",
                format!("expected 'property,direction', got '{}'", param),
            ));
        }
        Ok(SortOrder { field, direction })
    }

    /// Builds a sort from repeated `sort` parameters; `None` if there are none.
    pub fn from_params<'a, I>(params: I) -> Result<Option<Self>, ValidationError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let orders = params
            .into_iter()
            .filter(|p| !p.trim().is_empty())
            .map(Sort::parse_param)
            .collect::<Result<Vec<_>, _>>()?;
        if orders.is_empty() {
            Ok(None)
        } else {
            Ok(Some(Self { orders }))
        }
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .orders
            .iter()
            .map(|o| format!("{} {}", o.field.as_str(), o.direction.as_sql()))
            .collect();
        f.write_str(&rendered.join(", "))
    }
}

/// Zero-based page request with optional sort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    size: u32,
    sort: Option<Sort>,
}

impl PageRequest {
    /// Creates a page request.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if `size` is 0 or above `MAX_PAGE_SIZE`.
    pub fn new(page: u32, size: u32) -> Result<Self, ValidationError> {
        if size == 0 || size > MAX_PAGE_SIZE {
            return Err(ValidationError::out_of_range(
                "size",
                1,
                MAX_PAGE_SIZE as i64,
                size as i64,
            ));
        }
        Ok(Self {
            page,
            size,
            sort: None,
        })
    }

    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn sort(&self) -> Option<&Sort> {
        self.sort.as_ref()
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> u64 {
        self.page as u64 * self.size as u64
    }

    /// Returns this request with `default` applied if no sort was given.
    pub fn sorted_or(self, default: Sort) -> Self {
        match self.sort {
            Some(_) => self,
            None => self.with_sort(default),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: None,
        }
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    /// Items in this page.
    pub items: Vec<T>,

    /// Zero-based page number.
    pub page: u32,

    /// Requested page size.
    pub size: u32,

    /// Total number of matching items across all pages.
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: &PageRequest, total: u64) -> Self {
        Self {
            items,
            page: request.page(),
            size: request.size(),
            total,
        }
    }

    pub fn empty(request: &PageRequest) -> Self {
        Self::new(Vec::new(), request, 0)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total: self.total,
        }
    }
}
