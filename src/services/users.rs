use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::{AuthService, AuthUser};
use crate::entities::user::{
    self, ActiveModel as UserActiveModel, Entity as UserEntity, Model as UserModel,
};
use crate::errors::ServiceError;
use crate::models::Role;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    pub role: Option<Role>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    #[validate(email(message = "A valid email address is required"))]
    pub email: Option<String>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub department: Option<String>,
    pub job_title: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub county: Option<String>,
    pub postcode: Option<String>,
    pub avatar: Option<String>,
    /// Admin only.
    pub role: Option<Role>,
    /// Admin only.
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub department: Option<String>,
    pub job_title: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub county: Option<String>,
    pub postcode: Option<String>,
    pub role: Role,
    pub avatar: Option<String>,
    pub is_active: bool,
    pub join_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// User management. Listing, creation and deletion are admin gated;
/// get/update allow admin-or-self.
#[derive(Clone)]
pub struct UserService {
    db: Arc<DatabaseConnection>,
    auth: Arc<AuthService>,
}

impl UserService {
    pub fn new(db: Arc<DatabaseConnection>, auth: Arc<AuthService>) -> Self {
        Self { db, auth }
    }

    /// Self-registration. The role is always `user`; only the admin-gated
    /// create path may assign roles.
    #[instrument(skip(self, request))]
    pub async fn register(&self, request: RegisterRequest) -> Result<UserResponse, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        self.ensure_email_free(&request.email, None).await?;
        let created = self
            .insert_user(request.name, request.email, &request.password, Role::User)
            .await?;
        info!(user_id = created.id, "User registered");
        Ok(model_to_response(created))
    }

    /// Admin-gated user creation; may assign a role.
    #[instrument(skip(self, request), fields(caller_id = caller.id))]
    pub async fn create(
        &self,
        caller: &AuthUser,
        request: CreateUserRequest,
    ) -> Result<UserResponse, ServiceError> {
        self.ensure_admin(caller)?;
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        self.ensure_email_free(&request.email, None).await?;
        let created = self
            .insert_user(
                request.name,
                request.email,
                &request.password,
                request.role.unwrap_or(Role::User),
            )
            .await?;
        info!(user_id = created.id, "User created");
        Ok(model_to_response(created))
    }

    #[instrument(skip(self), fields(caller_id = caller.id))]
    pub async fn list(
        &self,
        caller: &AuthUser,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<UserResponse>, ServiceError> {
        self.ensure_admin(caller)?;

        let rows = UserEntity::find()
            .order_by_asc(user::Column::Id)
            .offset(skip)
            .limit(limit)
            .all(&*self.db)
            .await?;

        Ok(rows.into_iter().map(model_to_response).collect())
    }

    #[instrument(skip(self), fields(caller_id = caller.id))]
    pub async fn get(&self, caller: &AuthUser, id: i32) -> Result<UserResponse, ServiceError> {
        if !caller.is_admin() && caller.id != id {
            return Err(ServiceError::Forbidden(
                "Not enough permissions to access this user".to_string(),
            ));
        }

        let found = UserEntity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User with id {id} not found")))?;
        Ok(model_to_response(found))
    }

    #[instrument(skip(self, request), fields(caller_id = caller.id))]
    pub async fn update(
        &self,
        caller: &AuthUser,
        id: i32,
        request: UpdateUserRequest,
    ) -> Result<UserResponse, ServiceError> {
        if !caller.is_admin() && caller.id != id {
            return Err(ServiceError::Forbidden(
                "Not enough permissions to access this user".to_string(),
            ));
        }
        if !caller.is_admin() && (request.role.is_some() || request.is_active.is_some()) {
            return Err(ServiceError::Forbidden(
                "Only admins may change roles or activation".to_string(),
            ));
        }
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let found = UserEntity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User with id {id} not found")))?;

        if let Some(email) = &request.email {
            self.ensure_email_free(email, Some(id)).await?;
        }

        let mut active: UserActiveModel = found.into();
        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(email) = request.email {
            active.email = Set(email);
        }
        if let Some(password) = request.password {
            active.hashed_password = Set(self.auth.hash_password(&password)?);
        }
        if let Some(phone) = request.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(company) = request.company {
            active.company = Set(Some(company));
        }
        if let Some(department) = request.department {
            active.department = Set(Some(department));
        }
        if let Some(job_title) = request.job_title {
            active.job_title = Set(Some(job_title));
        }
        if let Some(address) = request.address {
            active.address = Set(Some(address));
        }
        if let Some(city) = request.city {
            active.city = Set(Some(city));
        }
        if let Some(county) = request.county {
            active.county = Set(Some(county));
        }
        if let Some(postcode) = request.postcode {
            active.postcode = Set(Some(postcode));
        }
        if let Some(avatar) = request.avatar {
            active.avatar = Set(Some(avatar));
        }
        if let Some(role) = request.role {
            active.role = Set(role.to_string());
        }
        if let Some(is_active) = request.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Some(Utc::now()));

        let updated = active.update(&*self.db).await?;
        info!(user_id = id, "User updated");
        Ok(model_to_response(updated))
    }

    #[instrument(skip(self), fields(caller_id = caller.id))]
    pub async fn delete(&self, caller: &AuthUser, id: i32) -> Result<(), ServiceError> {
        self.ensure_admin(caller)?;

        let found = UserEntity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User with id {id} not found")))?;

        UserEntity::delete_by_id(found.id).exec(&*self.db).await?;
        info!(user_id = id, "User deleted");
        Ok(())
    }

    fn ensure_admin(&self, caller: &AuthUser) -> Result<(), ServiceError> {
        if caller.is_admin() {
            Ok(())
        } else {
            Err(ServiceError::Forbidden(
                "Not enough permissions".to_string(),
            ))
        }
    }

    async fn ensure_email_free(
        &self,
        email: &str,
        excluding: Option<i32>,
    ) -> Result<(), ServiceError> {
        let mut select = UserEntity::find().filter(user::Column::Email.eq(email));
        if let Some(id) = excluding {
            select = select.filter(user::Column::Id.ne(id));
        }
        if select.one(&*self.db).await?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "A user with email {email} already exists"
            )));
        }
        Ok(())
    }

    async fn insert_user(
        &self,
        name: String,
        email: String,
        password: &str,
        role: Role,
    ) -> Result<UserModel, ServiceError> {
        let now = Utc::now();
        let created = UserActiveModel {
            name: Set(name),
            email: Set(email),
            phone: Set(None),
            company: Set(None),
            department: Set(None),
            job_title: Set(None),
            address: Set(None),
            city: Set(None),
            county: Set(None),
            postcode: Set(None),
            role: Set(role.to_string()),
            avatar: Set(None),
            hashed_password: Set(self.auth.hash_password(password)?),
            is_active: Set(true),
            join_date: Set(now),
            created_at: Set(now),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;
        Ok(created)
    }
}

fn model_to_response(model: UserModel) -> UserResponse {
    UserResponse {
        id: model.id,
        name: model.name,
        email: model.email,
        phone: model.phone,
        company: model.company,
        department: model.department,
        job_title: model.job_title,
        address: model.address,
        city: model.city,
        county: model.county,
        postcode: model.postcode,
        role: model.role.parse().unwrap_or(Role::User),
        avatar: model.avatar,
        is_active: model.is_active,
        join_date: model.join_date,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}
