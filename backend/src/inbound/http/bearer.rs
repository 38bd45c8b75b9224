//! The bearer-token authorization gate.
//!
//! Each extractor parses `Authorization: Bearer <token>` once, verifies it
//! against the process-wide [`TokenIssuer`], and hands the handler a tagged
//! [`Actor`]. Handlers never look at raw claims. Signature, expiry, and
//! shape failures all surface as the same opaque 401; a valid token of the
//! wrong kind is also a 401, differing only in message text. The admin gate
//! alone answers 403, since there the caller is authenticated and merely
//! lacks the role.

use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};

use crate::domain::{Actor, BankId, Error, Role, TokenIssuer, UserId};

fn missing_token() -> Error {
    Error::unauthorized("no authentication token, access denied")
}

fn invalid_token() -> Error {
    Error::unauthorized("token is not valid")
}

fn decode_actor(req: &HttpRequest) -> Result<Actor, Error> {
    let issuer = req
        .app_data::<web::Data<TokenIssuer>>()
        .ok_or_else(|| Error::internal("token issuer not configured"))?;

    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(missing_token)?;
    let value = header.to_str().map_err(|_| invalid_token())?;
    let token = value.strip_prefix("Bearer ").ok_or_else(missing_token)?;

    let claims = issuer.verify(token).map_err(|_| invalid_token())?;
    Ok(claims.actor())
}

/// Any authenticated identity, individual or bank.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedActor(pub Actor);

impl FromRequest for AuthenticatedActor {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(decode_actor(req).map(Self))
    }
}

/// An authenticated individual user account.
#[derive(Debug, Clone, Copy)]
pub struct IndividualActor {
    pub id: UserId,
    pub role: Role,
}

impl FromRequest for IndividualActor {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(decode_actor(req).and_then(|actor| match actor {
            Actor::Individual { id, role } => Ok(Self { id, role }),
            Actor::BloodBank { .. } => {
                Err(Error::unauthorized("not authorised as a user account"))
            }
        }))
    }
}

/// An authenticated blood bank (the stricter gate variant).
#[derive(Debug, Clone, Copy)]
pub struct BankActor(pub BankId);

impl FromRequest for BankActor {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(decode_actor(req).and_then(|actor| match actor {
            Actor::BloodBank { id } => Ok(Self(id)),
            Actor::Individual { .. } => {
                Err(Error::unauthorized("not authorised as a blood bank"))
            }
        }))
    }
}

/// An authenticated administrator.
#[derive(Debug, Clone, Copy)]
pub struct AdminActor(pub UserId);

impl FromRequest for AdminActor {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(decode_actor(req).and_then(|actor| match actor {
            Actor::Individual {
                id,
                role: Role::Admin,
            } => Ok(Self(id)),
            Actor::Individual { .. } => Err(Error::forbidden("admin access only")),
            Actor::BloodBank { .. } => {
                Err(Error::unauthorized("not authorised as a user account"))
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    //! Gate behaviour over a minimal app: one route per extractor.

    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};
    use chrono::Utc;

    use super::*;
    use crate::domain::{EmailAddress, SignedToken};
    use crate::inbound::http::ApiResult;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(b"gate-test-secret")
    }

    fn user_token(role: Role) -> SignedToken {
        let actor = Actor::Individual {
            id: UserId::random(),
            role,
        };
        issuer()
            .issue(&actor, &EmailAddress::new("a@x.com").expect("email"), Utc::now())
            .expect("token issued")
    }

    fn bank_token() -> SignedToken {
        let actor = Actor::BloodBank {
            id: BankId::random(),
        };
        issuer()
            .issue(&actor, &EmailAddress::new("b@x.com").expect("email"), Utc::now())
            .expect("token issued")
    }

    async fn gate_app() -> impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    > {
        test::init_service(
            App::new()
                .app_data(web::Data::new(issuer()))
                .route(
                    "/any",
                    web::get().to(|_actor: AuthenticatedActor| async {
                        ApiResult::Ok(HttpResponse::Ok().finish())
                    }),
                )
                .route(
                    "/user",
                    web::get().to(|_actor: IndividualActor| async {
                        ApiResult::Ok(HttpResponse::Ok().finish())
                    }),
                )
                .route(
                    "/bank",
                    web::get().to(|_actor: BankActor| async {
                        ApiResult::Ok(HttpResponse::Ok().finish())
                    }),
                )
                .route(
                    "/admin",
                    web::get().to(|_actor: AdminActor| async {
                        ApiResult::Ok(HttpResponse::Ok().finish())
                    }),
                ),
        )
        .await
    }

    async fn status_of(path: &str, token: Option<&str>) -> StatusCode {
        let app = gate_app().await;
        let mut request = test::TestRequest::get().uri(path);
        if let Some(token) = token {
            request = request.insert_header(("Authorization", format!("Bearer {token}")));
        }
        test::call_service(&app, request.to_request()).await.status()
    }

    #[actix_web::test]
    async fn missing_tokens_are_unauthorised() {
        assert_eq!(status_of("/any", None).await, StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn garbage_tokens_are_unauthorised() {
        assert_eq!(
            status_of("/any", Some("garbage")).await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[actix_web::test]
    async fn tokens_signed_elsewhere_are_unauthorised() {
        let forged = TokenIssuer::new(b"another-secret")
            .issue(
                &Actor::Individual {
                    id: UserId::random(),
                    role: Role::User,
                },
                &EmailAddress::new("a@x.com").expect("email"),
                Utc::now(),
            )
            .expect("token issued");
        assert_eq!(
            status_of("/any", Some(forged.as_str())).await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[actix_web::test]
    async fn expired_tokens_are_unauthorised() {
        let expired = TokenIssuer::with_ttl(b"gate-test-secret", -3600)
            .issue(
                &Actor::Individual {
                    id: UserId::random(),
                    role: Role::User,
                },
                &EmailAddress::new("a@x.com").expect("email"),
                Utc::now(),
            )
            .expect("token issued");
        assert_eq!(
            status_of("/any", Some(expired.as_str())).await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[actix_web::test]
    async fn valid_tokens_pass_the_general_gate() {
        let token = user_token(Role::User);
        assert_eq!(status_of("/any", Some(token.as_str())).await, StatusCode::OK);
    }

    #[actix_web::test]
    async fn the_bank_gate_rejects_user_tokens_with_401() {
        let token = user_token(Role::User);
        assert_eq!(
            status_of("/bank", Some(token.as_str())).await,
            StatusCode::UNAUTHORIZED
        );
        let token = bank_token();
        assert_eq!(
            status_of("/bank", Some(token.as_str())).await,
            StatusCode::OK
        );
    }

    #[actix_web::test]
    async fn the_user_gate_rejects_bank_tokens_with_401() {
        let token = bank_token();
        assert_eq!(
            status_of("/user", Some(token.as_str())).await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[actix_web::test]
    async fn the_admin_gate_distinguishes_role_from_authentication() {
        let plain = user_token(Role::User);
        assert_eq!(
            status_of("/admin", Some(plain.as_str())).await,
            StatusCode::FORBIDDEN
        );
        let admin = user_token(Role::Admin);
        assert_eq!(
            status_of("/admin", Some(admin.as_str())).await,
            StatusCode::OK
        );
    }
}
