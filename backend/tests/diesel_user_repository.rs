//! Integration tests for `DieselUserRepository` against embedded PostgreSQL.
//!
//! Opt in with `RUN_PG_EMBEDDED=1`; each test provisions its own cluster and
//! a freshly migrated database through `pg-embedded-setup-unpriv`.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use postgres::{Client, NoTls};
use rstest::{fixture, rstest};
use serde_json::json;
use tokio::runtime::Runtime;
use uuid::Uuid;

use userbase::Trace;
use userbase::domain::ports::{UserPersistenceError, UserRepository};
use userbase::domain::{
    CredentialAuthenticator, EmailAddress, NewUser, PasswordDigest, PersonName,
    UserRegistrationService,
};
use userbase::inbound::http::state::HttpState;
use userbase::inbound::http::users;
use userbase::outbound::hashing::BcryptPasswordHasher;
use userbase::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};

mod support;

use support::{MigratedDatabase, count_users_with_email, migrated_database};

const DUPLICATE_EMAIL: &str = "An account with this email address already exists";

#[fixture]
fn database() -> Option<MigratedDatabase> {
    migrated_database()
}

async fn repository(url: &str) -> DieselUserRepository {
    let config = PoolConfig::new(url).with_max_size(2).with_min_idle(Some(1));
    let pool = DbPool::new(config).await.expect("pool builds");
    DieselUserRepository::new(pool)
}

fn new_user(first_name: &str, email: &str) -> NewUser {
    NewUser {
        first_name: PersonName::new(first_name).expect("first name"),
        last_name: PersonName::new("Doe").expect("last name"),
        email_address: EmailAddress::new(email).expect("email"),
        password_digest: PasswordDigest::new("$2b$04$storedstoredstoredstoreu").expect("digest"),
    }
}

#[rstest]
fn created_user_is_found_by_email(database: Option<MigratedDatabase>) {
    let Some(database) = database else {
        eprintln!("SKIP-TEST-CLUSTER: created_user_is_found_by_email skipped");
        return;
    };
    let runtime = Runtime::new().expect("runtime");

    let (created, found) = runtime.block_on(async {
        let repo = repository(&database.url).await;
        let created = repo
            .create(&new_user("Jane", "jane@example.com"))
            .await
            .expect("create user");
        let found = repo
            .find_by_email(&EmailAddress::new("jane@example.com").expect("email"))
            .await
            .expect("lookup");
        (created, found)
    });

    assert_eq!(found, Some(created));
}

#[rstest]
fn unknown_email_is_absent(database: Option<MigratedDatabase>) {
    let Some(database) = database else {
        eprintln!("SKIP-TEST-CLUSTER: unknown_email_is_absent skipped");
        return;
    };
    let runtime = Runtime::new().expect("runtime");

    let found = runtime.block_on(async {
        repository(&database.url)
            .await
            .find_by_email(&EmailAddress::new("ghost@example.com").expect("email"))
            .await
            .expect("lookup")
    });

    assert!(found.is_none());
}

#[rstest]
fn duplicate_email_is_a_constraint_violation(database: Option<MigratedDatabase>) {
    let Some(database) = database else {
        eprintln!("SKIP-TEST-CLUSTER: duplicate_email_is_a_constraint_violation skipped");
        return;
    };
    let runtime = Runtime::new().expect("runtime");

    let second = runtime.block_on(async {
        let repo = repository(&database.url).await;
        repo.create(&new_user("Jane", "jane@example.com"))
            .await
            .expect("first insert");
        repo.create(&new_user("Janet", "jane@example.com")).await
    });

    assert_eq!(
        second,
        Err(UserPersistenceError::constraint_violation(vec![
            DUPLICATE_EMAIL.to_owned()
        ]))
    );
    assert_eq!(
        count_users_with_email(&database.url, "jane@example.com").expect("count"),
        1
    );
}

#[rstest]
#[case("first_name")]
#[case("last_name")]
#[case("email_address")]
#[case("password")]
fn empty_columns_trip_named_checks(database: Option<MigratedDatabase>, #[case] column: &str) {
    let Some(database) = database else {
        eprintln!("SKIP-TEST-CLUSTER: empty_columns_trip_named_checks skipped");
        return;
    };
    let mut client = Client::connect(&database.url, NoTls).expect("connect");
    let value = |name: &str| if name == column { "" } else { "filled" };

    let err = client
        .execute(
            "INSERT INTO users (id, first_name, last_name, email_address, password) \
             VALUES ($1, $2, $3, $4, $5)",
            &[
                &Uuid::new_v4(),
                &value("first_name"),
                &value("last_name"),
                &value("email_address"),
                &value("password"),
            ],
        )
        .expect_err("empty value rejected");

    let db_error = err.as_db_error().expect("database error");
    assert_eq!(db_error.constraint(), Some(format!("users_{column}_check").as_str()));
}

#[rstest]
fn same_email_posted_twice_keeps_one_row(database: Option<MigratedDatabase>) {
    let Some(database) = database else {
        eprintln!("SKIP-TEST-CLUSTER: same_email_posted_twice_keeps_one_row skipped");
        return;
    };
    let body = json!({
        "firstName": "Jane",
        "lastName": "Doe",
        "emailAddress": "jane@example.com",
        "password": "secret1"
    });

    let (first, second, messages) = actix_web::rt::System::new().block_on(async {
        let repo = Arc::new(repository(&database.url).await);
        let hasher = Arc::new(BcryptPasswordHasher::new(4).expect("minimum bcrypt cost"));
        let registration = UserRegistrationService::new(repo.clone(), hasher.clone());
        let authenticator = CredentialAuthenticator::new(repo, hasher);
        let state = HttpState::new(Arc::new(registration), Arc::new(authenticator));
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .wrap(Trace)
                .configure(users::configure),
        )
        .await;

        let post = || {
            actix_test::TestRequest::post()
                .uri("/api/users")
                .set_json(&body)
                .to_request()
        };
        let first = actix_test::call_service(&app, post()).await.status();
        let second = actix_test::call_service(&app, post()).await;
        let status = second.status();
        let messages: Vec<String> = actix_test::read_body_json(second).await;
        (first, status, messages)
    });

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::BAD_REQUEST);
    assert_eq!(messages, [DUPLICATE_EMAIL]);
    assert_eq!(
        count_users_with_email(&database.url, "jane@example.com").expect("count"),
        1
    );
}
