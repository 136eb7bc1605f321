use crate::{app_env, persistence};
use dotenv::dotenv;
use lazy_static::lazy_static;
use rand::{Rng, thread_rng};
use sqlx::{Connection, PgConnection, PgPool, Row};
use std::{env, future::Future};
use tokio::runtime::Runtime;

lazy_static! {
    static ref TOKIO_RT: Runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Tokio runtime failed to initialize");
}

struct TestDatabase {
    db_name: String,
}

impl TestDatabase {
    async fn create(admin_cxn: &mut PgConnection) -> Result<Self, sqlx::Error> {
        let mut rng = thread_rng();
        let db_id: u32 = rng.gen_range(10_000..99_999);
        let db_name = format!("test_db_{}", db_id);

        sqlx::query(format!("CREATE DATABASE {}", db_name).as_str())
            .execute(&mut *admin_cxn)
            .await?;

        Ok(Self { db_name })
    }

    fn db_name(&self) -> &str {
        self.db_name.as_str()
    }
}

/// Best-effort cleanup of databases left behind by earlier test runs. A database owned
/// by a concurrently running test can't be dropped, which is fine - a later run gets it.
async fn drop_old_test_dbs(admin_cxn: &mut PgConnection) {
    let old_dbs = sqlx::query(
        "SELECT datname FROM pg_catalog.pg_database WHERE datname LIKE 'test_db_%'",
    )
    .fetch_all(&mut *admin_cxn)
    .await;
    let Ok(old_dbs) = old_dbs else {
        println!("Warning: failed to list old test databases. You may need to drop them manually.");
        return;
    };

    for db_row in old_dbs {
        let db_name: String = db_row.get(0);
        let drop_result = sqlx::query(format!("DROP DATABASE {}", db_name).as_str())
            .execute(&mut *admin_cxn)
            .await;
        if drop_result.is_err() {
            println!("Warning: failed to drop old test database {db_name}, you may need to do it manually.");
        }
    }
}

/// Provisions a throwaway database for a single test, applies the app schema to it, and
/// hands the test a pool pointed at it.
///
/// Expects the TEST_DB_URL environment variable to hold the base postgres connection
/// string (no database name in the path).
pub fn prepare_db_and_test<F, R>(test_fn: F)
where
    R: Future<Output = ()>,
    F: FnOnce(PgPool) -> R,
{
    if dotenv().is_err() {
        println!("Test is running without .env file.");
    }

    TOKIO_RT.block_on(async move {
        let base_db_url = env::var(app_env::test::TEST_DB_URL).expect(
            "You must provide the TEST_DB_URL environment variable as the base postgres connection string",
        );

        let test_db = {
            let mut admin_cxn = PgConnection::connect(&base_db_url)
                .await
                .expect("Test failure - could not connect to provision a test database.");
            drop_old_test_dbs(&mut admin_cxn).await;
            let test_db = TestDatabase::create(&mut admin_cxn)
                .await
                .expect("Failed to create a test database");
            let _ = admin_cxn.close().await;

            test_db
        };

        let db_pool =
            persistence::connect_sqlx(format!("{}/{}", base_db_url, test_db.db_name()).as_str())
                .await
                .expect("Could not connect to the test database");
        persistence::ensure_schema(&db_pool)
            .await
            .expect("Could not apply the schema to the test database");

        test_fn(db_pool).await;
    });
}
