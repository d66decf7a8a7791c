//! # User Repository
//!
//! Staff records: who can sell, who manages which store, and the points
//! behind the seller leaderboard.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use tiresaas_core::validation::{validate_email, validate_required_text};
use tiresaas_core::{Role, User, UserStatus};

use crate::error::{DataError, DataResult};

/// Points a seller earns per closed sale.
pub const POINTS_PER_SALE: i64 = 10;

/// In-memory user records. Clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct UserRepository {
    users: Arc<RwLock<Vec<User>>>,
}

impl UserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<User>) -> Self {
        UserRepository {
            users: Arc::new(RwLock::new(users)),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<User>> {
        self.users.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<User>> {
        self.users.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn list(&self) -> Vec<User> {
        self.read().clone()
    }

    pub fn get_by_id(&self, id: &str) -> Option<User> {
        self.read().iter().find(|u| u.id == id).cloned()
    }

    /// Users that can be picked as the seller on a sale.
    pub fn sellers(&self) -> Vec<User> {
        self.read().iter().filter(|u| u.can_sell()).cloned().collect()
    }

    /// Filters by role and status; `None` means "any".
    pub fn filter(&self, role: Option<Role>, status: Option<UserStatus>) -> Vec<User> {
        self.read()
            .iter()
            .filter(|u| role.map_or(true, |r| u.role == r))
            .filter(|u| status.map_or(true, |s| u.status == s))
            .cloned()
            .collect()
    }

    /// Registers a new active user.
    ///
    /// ## Errors
    /// - `Validation` - blank name or a bad email
    /// - `Duplicate` - the email is taken
    pub fn create(
        &self,
        name: &str,
        email: &str,
        role: Role,
        store_id: Option<String>,
    ) -> DataResult<User> {
        let name = validate_required_text("name", name, 100)?;
        validate_email(email)?;
        let email = email.trim().to_lowercase();

        let mut users = self.write();
        if users.iter().any(|u| u.email == email) {
            return Err(DataError::duplicate("email", email));
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            phone: String::new(),
            role,
            store_id,
            status: UserStatus::Active,
            monthly_sales: 0,
            points: 0,
            joined_on: Utc::now().date_naive(),
            last_login: None,
        };

        debug!(id = %user.id, role = ?user.role, "Creating user");
        users.push(user.clone());
        Ok(user)
    }

    pub fn set_status(&self, id: &str, status: UserStatus) -> DataResult<()> {
        self.modify(id, |u| u.status = status)
    }

    pub fn touch_login(&self, id: &str, at: DateTime<Utc>) -> DataResult<()> {
        self.modify(id, |u| u.last_login = Some(at))
    }

    /// Credits a closed sale to a seller.
    ///
    /// ## Returns
    /// The seller's new point total.
    pub fn credit_sale(&self, id: &str) -> DataResult<i64> {
        let mut points = 0;
        self.modify(id, |u| {
            u.monthly_sales += 1;
            u.points += POINTS_PER_SALE;
            points = u.points;
        })?;

        debug!(id = %id, points, "Credited sale");
        Ok(points)
    }

    pub fn delete(&self, id: &str) -> DataResult<()> {
        let mut users = self.write();
        let before = users.len();
        users.retain(|u| u.id != id);

        if users.len() == before {
            return Err(DataError::not_found("User", id));
        }
        Ok(())
    }

    fn modify(&self, id: &str, change: impl FnOnce(&mut User)) -> DataResult<()> {
        let mut users = self.write();
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| DataError::not_found("User", id))?;
        change(user);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::sample_users;

    #[test]
    fn test_sellers_excludes_inactive() {
        let repo = UserRepository::with_users(sample_users());
        let sellers = repo.sellers();
        assert_eq!(sellers.len(), 3);
        assert!(sellers.iter().all(|u| u.name != "Ana Oliveira"));
    }

    #[test]
    fn test_filter() {
        let repo = UserRepository::with_users(sample_users());
        assert_eq!(repo.filter(Some(Role::Seller), None).len(), 2);
        assert_eq!(
            repo.filter(Some(Role::Seller), Some(UserStatus::Active)).len(),
            1
        );
        assert_eq!(repo.filter(None, None).len(), 4);
    }

    #[test]
    fn test_create_rejects_taken_email() {
        let repo = UserRepository::with_users(sample_users());
        assert!(matches!(
            repo.create("Outra Maria", "MARIA@tiresaas.com", Role::Seller, None),
            Err(DataError::Duplicate { .. })
        ));

        let user = repo
            .create("Lucas Lima", "lucas@tiresaas.com", Role::Seller, Some("loja-norte".into()))
            .unwrap();
        assert_eq!(user.status, UserStatus::Active);
        assert_eq!(repo.list().len(), 5);
    }

    #[test]
    fn test_credit_sale() {
        let repo = UserRepository::with_users(sample_users());
        assert_eq!(repo.credit_sale("user-pedro").unwrap(), 1100 + POINTS_PER_SALE);
        assert_eq!(repo.get_by_id("user-pedro").unwrap().monthly_sales, 19);
        assert!(repo.credit_sale("nobody").is_err());
    }

    #[test]
    fn test_status_and_delete() {
        let repo = UserRepository::with_users(sample_users());
        repo.set_status("user-ana", UserStatus::Active).unwrap();
        assert_eq!(repo.sellers().len(), 4);

        repo.touch_login("user-ana", Utc::now()).unwrap();
        repo.delete("user-ana").unwrap();
        assert!(repo.delete("user-ana").is_err());
    }
}
