use gatehouse_auth::TokenCodec;
use gatehouse_core::{AppError, spawn_hash_password, spawn_verify_password};
use gatehouse_db::UserRepository;
use gatehouse_models::{
    AuthResponse, LoginRequest, NewUser, Principal, RegisterRequest, Role, UserView,
};
use tracing::{info, instrument};

pub struct AuthService;

impl AuthService {
    /// Creates an active `user` and signs a token for it.
    #[instrument(skip(repository, tokens, dto), fields(user.email = %dto.email))]
    pub async fn register_user(
        repository: &dyn UserRepository,
        tokens: &TokenCodec,
        bcrypt_cost: u32,
        dto: RegisterRequest,
    ) -> Result<AuthResponse, AppError> {
        if repository.find_by_email(&dto.email).await?.is_some() {
            return Err(AppError::conflict("email already existed"));
        }

        let password_hash = spawn_hash_password(dto.password, bcrypt_cost).await?;

        let record = repository
            .insert(NewUser {
                email: dto.email,
                password_hash,
                role: Role::User,
                is_active: true,
            })
            .await?;
        info!(user.id = %record.id, "User registered");

        let token = tokens.issue(&Principal::from(&record))?;
        Ok(AuthResponse {
            user: UserView::from(record),
            token,
        })
    }

    /// Checks credentials. Inactive users still receive a token; every
    /// authenticated request they make is then refused.
    #[instrument(skip(repository, tokens, dto), fields(user.email = %dto.email))]
    pub async fn login_user(
        repository: &dyn UserRepository,
        tokens: &TokenCodec,
        dto: LoginRequest,
    ) -> Result<AuthResponse, AppError> {
        let record = repository
            .find_by_email(&dto.email)
            .await?
            .ok_or_else(|| AppError::unauthorized("invalid email or password"))?;

        if !spawn_verify_password(dto.password, record.password_hash.clone()).await? {
            return Err(AppError::unauthorized("invalid email or password"));
        }

        let token = tokens.issue(&Principal::from(&record))?;
        Ok(AuthResponse {
            user: UserView::from(record),
            token,
        })
    }

    /// Re-issues a token for an already authenticated principal.
    pub fn refresh(tokens: &TokenCodec, principal: &Principal) -> Result<AuthResponse, AppError> {
        Ok(AuthResponse {
            user: UserView::from(principal),
            token: tokens.issue(principal)?,
        })
    }
}
