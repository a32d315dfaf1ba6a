//! Wiring a small application with the Tawsil container.
//!
//! Run with `RUST_LOG=tawsil_container=trace cargo run --example wiring`.

use std::sync::Arc;

use tawsil::injectable;
use tawsil::prelude::*;
use tracing_subscriber::EnvFilter;

// === Define your traits and types ===

trait Logger: Send + Sync {
    fn log(&self, msg: &str);
}

struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, msg: &str) {
        println!("[LOG] {msg}");
    }
}

struct Database {
    url: String,
    logger: Arc<dyn Logger>,
}

#[injectable]
impl Database {
    fn new(database_url: String, logger: Arc<dyn Logger>) -> Self {
        Self { url: database_url, logger }
    }

    fn query(&self, sql: &str) -> String {
        self.logger.log(&format!("Executing: {sql}"));
        format!("Results from {}", self.url)
    }
}

struct UserRepository {
    db: Arc<Database>,
}

#[injectable]
impl UserRepository {
    fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn find_user(&self, user_id: u64) -> String {
        self.db.query(&format!("SELECT * FROM users WHERE id = {user_id}"))
    }
}

#[injectable]
fn banner(app_name: String, #[inject(default = String::from("dev"))] env: String) -> String {
    format!("{app_name} ({env})")
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tawsil_container=debug")),
        )
        .init();

    let container = Container::new();

    // plain values
    container.bind("app_name", Value::new(String::from("users-api")))?;
    container.bind("database_url", Value::new(String::from("postgres://localhost/myapp")))?;
    container.bind("logger", Value::new(Arc::new(ConsoleLogger) as Arc<dyn Logger>))?;

    // one shared database, a fresh repository per `get`
    container.singleton("primary_db", Target::constructor("Database"))?;
    container.alias("primary_db", "Database")?;
    container.factory_self("UserRepository")?;

    println!("{container:?}");
    println!("{}", container.call(banner_invocable())?.try_cloned::<String>("banner")?);

    // method on a freshly constructed repository
    let found = container.call(Target::method(Owner::of_type("UserRepository"), "find_user"));
    match found {
        Err(err) if err.is_not_found() => println!("Expected: {err}"),
        other => println!("Unexpected: {other:?}"),
    }

    // explicit arguments reach the method when called on an instance
    let repo = container.get("UserRepository")?;
    let args = Args::new().with("user_id", Value::new(42u64));
    let result = container.invoke(Target::method(Owner::instance(repo), "find_user"), args)?;
    println!("{}", result.try_cloned::<String>("find_user")?);

    // scalars fall through to untyped resolvers when nothing is bound
    container.add_resolver(|id: &str, _: &Container| -> Result<Option<Value>> {
        Ok((id == "user_id").then(|| Value::new(7u64)))
    });
    let result = container.call(Target::method(Owner::of_type("UserRepository"), "find_user"))?;
    println!("{}", result.try_cloned::<String>("find_user")?);

    let a = container.get("primary_db")?;
    let b = container.get("primary_db")?;
    tracing::info!(shared = a.ptr_eq(&b), "Primary database singleton");

    Ok(())
}
