//! Signed-in account operations: profile, addresses and orders.

mod types;

use serde_json::json;
use thiserror::Error;
use tracing::{debug, info};

use crate::graphql::operations::{
    ADD_ADDRESS, DELETE_ADDRESS, GET_ADDRESSES, GET_ALL_ORDERS, GET_MY_ORDERS_PAGINATED,
    GET_MY_ORDER_DETAIL, UPDATE_ADDRESS, UPDATE_USER,
};
use crate::graphql::{FetchPolicy, GraphqlClient, GraphqlError};
use crate::session::{
    is_valid_name, is_valid_password, password_length_message, Session, MIN_NAME_LEN,
};

pub use types::{
    Address, AddressInput, OrderCustomer, OrderDetail, OrderItem, OrderLine, OrderPage,
    OrderPagination, OrderSummary, PaymentMethod, UpdatedUser, UserUpdate,
};

const MIN_PHONE_LEN: usize = 10;

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("{0}")]
    Invalid(String),

    #[error("Account request failed: {0}")]
    Graphql(#[from] GraphqlError),
}

impl AccountError {
    pub fn error_type(&self) -> &'static str {
        match self {
            AccountError::Invalid(_) => "validation_error",
            AccountError::Graphql(e) => e.error_type(),
        }
    }
}

/// Profile edit form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProfileForm {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl ProfileForm {
    pub fn validate(&self) -> Result<(), AccountError> {
        for (label, value) in [("First name", &self.first_name), ("Last name", &self.last_name)] {
            if !is_valid_name(value) {
                return Err(AccountError::Invalid(format!(
                    "{} must be at least {} letters and contain only valid characters",
                    label, MIN_NAME_LEN
                )));
            }
        }

        if !self.new_password.is_empty() {
            if self.new_password != self.confirm_password {
                return Err(AccountError::Invalid("Passwords do not match".to_string()));
            }
            if !is_valid_password(&self.new_password) {
                return Err(AccountError::Invalid(password_length_message()));
            }
        }

        let phone = self.phone.trim();
        if !phone.is_empty() && phone.chars().count() < MIN_PHONE_LEN {
            return Err(AccountError::Invalid(format!(
                "Phone number must be at least {} digits",
                MIN_PHONE_LEN
            )));
        }
        Ok(())
    }

    /// Mutation payload for the signed-in user.
    pub fn to_update(&self, session: &Session) -> UserUpdate {
        let first_name = self.first_name.trim().to_string();
        let last_name = self.last_name.trim().to_string();
        let phone = self.phone.trim();
        UserUpdate {
            id: session.user.id.clone(),
            name: format!("{} {}", first_name, last_name),
            first_name,
            last_name,
            phone: (!phone.is_empty()).then(|| phone.to_string()),
            password: (!self.new_password.is_empty()).then(|| self.new_password.clone()),
            auth_type: session.user.auth_type.clone(),
            rol: session.user.rol.clone(),
            email: session
                .user
                .email
                .as_deref()
                .unwrap_or_default()
                .trim()
                .to_string(),
        }
    }
}

/// Account queries for the signed-in user. The client must carry the
/// session's access token.
#[derive(Clone)]
pub struct AccountService {
    client: GraphqlClient,
}

impl AccountService {
    pub fn new(client: GraphqlClient) -> Self {
        Self { client }
    }

    pub async fn update_user(
        &self,
        form: &ProfileForm,
        session: &Session,
    ) -> Result<UpdatedUser, AccountError> {
        form.validate()?;
        let update = form.to_update(session);
        let user: UpdatedUser = self
            .client
            .mutate(&UPDATE_USER, "updateUser", &json!({ "data": update }))
            .await?;
        info!(user_id = %session.user.id, "Profile updated");
        Ok(user)
    }

    pub async fn addresses(&self) -> Result<Vec<Address>, AccountError> {
        let addresses = self
            .client
            .query(&GET_ADDRESSES, "getAddresses", &json!({}), FetchPolicy::CacheFirst)
            .await?;
        Ok(addresses)
    }

    pub async fn add_address(&self, input: &AddressInput) -> Result<Address, AccountError> {
        if let Some(field) = input.first_missing() {
            return Err(AccountError::Invalid(format!("The {} field is required", field)));
        }
        let address: Address = self
            .client
            .mutate(&ADD_ADDRESS, "addAddress", &json!({ "input": input }))
            .await?;
        self.invalidate_addresses();
        Ok(address)
    }

    pub async fn update_address(
        &self,
        id: i64,
        input: &AddressInput,
    ) -> Result<Address, AccountError> {
        let address: Address = self
            .client
            .mutate(
                &UPDATE_ADDRESS,
                "updateAddress",
                &json!({ "id": id, "input": input }),
            )
            .await?;
        self.invalidate_addresses();
        Ok(address)
    }

    pub async fn delete_address(&self, id: i64) -> Result<bool, AccountError> {
        let deleted: bool = self
            .client
            .mutate(&DELETE_ADDRESS, "deleteAddress", &json!({ "id": id }))
            .await?;
        self.invalidate_addresses();
        Ok(deleted)
    }

    pub async fn my_orders(&self, page: u32, limit: u32) -> Result<OrderPage, AccountError> {
        let orders = self
            .client
            .query(
                &GET_MY_ORDERS_PAGINATED,
                "myOrdersPaginated",
                &json!({ "page": page.max(1), "limit": limit }),
                FetchPolicy::NetworkOnly,
            )
            .await?;
        Ok(orders)
    }

    /// Orders of every customer, with their lines.
    pub async fn all_orders(&self, page: u32, limit: u32) -> Result<OrderPage, AccountError> {
        let orders = self
            .client
            .query(
                &GET_ALL_ORDERS,
                "allOrders",
                &json!({ "page": page.max(1), "limit": limit }),
                FetchPolicy::NetworkOnly,
            )
            .await?;
        Ok(orders)
    }

    pub async fn order_detail(
        &self,
        external_reference: &str,
    ) -> Result<Option<OrderDetail>, AccountError> {
        let detail = self
            .client
            .query(
                &GET_MY_ORDER_DETAIL,
                "myOrderDetail",
                &json!({ "externalReference": external_reference }),
                FetchPolicy::NetworkOnly,
            )
            .await?;
        Ok(detail)
    }

    fn invalidate_addresses(&self) {
        let evicted = self.client.cache().evict_operation(GET_ADDRESSES.name);
        debug!(evicted, "Address cache invalidated");
    }
}
