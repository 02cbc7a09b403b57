//! Integration tests for the command pipeline: event dispatch order, the
//! template/formatted-statement split, error propagation, and the client
//! factory guard.

use chsql::{
    ChClient, ChError, ChResult, ClientOptions, ConfigUpdate, Connect, Driver, EventKind, Row,
    SqlValue, Statement,
};
use serde_json::json;
use std::sync::{Arc, Mutex};

struct MockDriver {
    executed: Mutex<Vec<String>>,
    rows: Vec<Row>,
    fail_with: Option<String>,
}

impl MockDriver {
    fn returning(rows: Vec<Row>) -> Self {
        Self {
            executed: Mutex::new(Vec::new()),
            rows,
            fail_with: None,
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            executed: Mutex::new(Vec::new()),
            rows: Vec::new(),
            fail_with: Some(message.to_string()),
        }
    }

    fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Driver for MockDriver {
    async fn execute(&self, sql: &str) -> ChResult<Vec<Row>> {
        self.executed.lock().unwrap().push(sql.to_string());
        match &self.fail_with {
            Some(message) => Err(ChError::execution(message.clone())),
            None => Ok(self.rows.clone()),
        }
    }
}

fn row(value: serde_json::Value) -> Row {
    let serde_json::Value::Object(map) = value else {
        panic!("expected a JSON object");
    };
    Row::new(map)
}

fn event_log() -> Arc<Mutex<Vec<String>>> {
    Arc::new(Mutex::new(Vec::new()))
}

fn push(log: &Arc<Mutex<Vec<String>>>, entry: impl Into<String>) {
    log.lock().unwrap().push(entry.into());
}

#[tokio::test]
async fn events_fire_in_order_around_a_successful_call() {
    let driver = Arc::new(MockDriver::returning(vec![row(json!({"id": 1}))]));
    let mut client = ChClient::with_driver(Arc::clone(&driver) as Arc<dyn Driver>);

    let log = event_log();
    for label in ["before:A", "before:B"] {
        let log = Arc::clone(&log);
        client.subscribe(EventKind::BeforeExecute, move |_| push(&log, label));
    }
    {
        let log = Arc::clone(&log);
        client.subscribe(EventKind::AfterExecute, move |ctx| {
            let rows = ctx.result.as_ref().map(Vec::len).unwrap_or(0);
            push(&log, format!("after:{rows}"));
        });
    }

    let statement = Statement::new("SELECT * FROM t WHERE id = ?", vec![SqlValue::from(1)]);
    let rows = client.execute(&statement).await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(
        log.lock().unwrap().as_slice(),
        ["before:A", "before:B", "after:1"]
    );
    // The driver saw one call, fully substituted.
    assert_eq!(driver.executed(), ["SELECT * FROM t WHERE id = 1"]);
}

#[tokio::test]
async fn context_keeps_template_after_formatting() {
    let driver = Arc::new(MockDriver::returning(vec![]));
    let mut client = ChClient::with_driver(driver as Arc<dyn Driver>);

    let seen = Arc::new(Mutex::new(Vec::new()));
    {
        let seen = Arc::clone(&seen);
        client.subscribe(EventKind::BeforeExecute, move |ctx| {
            seen.lock()
                .unwrap()
                .push((ctx.sql.clone(), ctx.sql_text.clone()));
        });
    }

    let statement = Statement::new("SELECT * FROM t WHERE id = ?", vec![SqlValue::from(5)]);
    client.execute(&statement).await.unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(
        seen.as_slice(),
        [(
            "SELECT * FROM t WHERE id = 5".to_string(),
            "SELECT * FROM t WHERE id = ?".to_string()
        )]
    );
}

#[tokio::test]
async fn driver_failure_fires_error_event_and_reraises() {
    let driver = Arc::new(MockDriver::failing("connection refused"));
    let mut client = ChClient::with_driver(driver as Arc<dyn Driver>);

    let log = event_log();
    {
        let log = Arc::clone(&log);
        client.subscribe(EventKind::AfterExecute, move |_| push(&log, "after"));
    }
    {
        let log = Arc::clone(&log);
        client.subscribe(EventKind::ExecuteError, move |ctx| {
            let error = ctx.error.as_ref().map(ToString::to_string).unwrap_or_default();
            push(&log, format!("error:{error}"));
        });
    }

    let statement = Statement::new("SELECT 1", vec![]);
    let err = client.execute(&statement).await.unwrap_err();

    // The original error reaches the caller unchanged.
    assert!(err.is_execution());
    assert_eq!(err.to_string(), "Execution error: connection refused");
    // The error event fired exactly once; AfterExecute never fired.
    assert_eq!(
        log.lock().unwrap().as_slice(),
        ["error:Execution error: connection refused"]
    );
}

#[tokio::test]
async fn format_failure_fires_error_event() {
    // Formatting happens inside the guarded region, so a template/argument
    // mismatch is observed by ExecuteError subscribers before it is
    // re-raised. BeforeExecute never fires and the driver is never called.
    let driver = Arc::new(MockDriver::returning(vec![]));
    let mut client = ChClient::with_driver(Arc::clone(&driver) as Arc<dyn Driver>);

    let log = event_log();
    {
        let log = Arc::clone(&log);
        client.subscribe(EventKind::BeforeExecute, move |_| push(&log, "before"));
    }
    {
        let log = Arc::clone(&log);
        client.subscribe(EventKind::ExecuteError, move |ctx| {
            let is_format = ctx.error.as_ref().is_some_and(ChError::is_format);
            // The formatted statement was never produced.
            push(&log, format!("error:format={is_format}:sql={}", ctx.sql));
        });
    }

    let statement = Statement::new("SELECT ? + ?", vec![SqlValue::from(1)]);
    let err = client.execute(&statement).await.unwrap_err();

    assert!(err.is_format());
    assert_eq!(
        log.lock().unwrap().as_slice(),
        ["error:format=true:sql=SELECT ? + ?"]
    );
    assert!(driver.executed().is_empty());
}

#[tokio::test]
async fn duplicate_subscriptions_fire_twice() {
    let driver = Arc::new(MockDriver::returning(vec![]));
    let mut client = ChClient::with_driver(driver as Arc<dyn Driver>);

    let log = event_log();
    let handler = {
        let log = Arc::clone(&log);
        Arc::new(move |_: &chsql::ExecutionContext| push(&log, "before"))
            as chsql::EventHandler
    };
    client.subscribe_arc(EventKind::BeforeExecute, Arc::clone(&handler));
    client.subscribe_arc(EventKind::BeforeExecute, handler);

    client
        .execute(&Statement::new("SELECT 1", vec![]))
        .await
        .unwrap();

    assert_eq!(log.lock().unwrap().as_slice(), ["before", "before"]);
}

#[tokio::test]
async fn subscriptions_via_config_merge_participate_in_dispatch() {
    let driver = Arc::new(MockDriver::returning(vec![]));
    let mut client = ChClient::with_driver(driver as Arc<dyn Driver>);

    let log = event_log();
    {
        let log = Arc::clone(&log);
        client.subscribe(EventKind::BeforeExecute, move |_| push(&log, "direct"));
    }
    {
        let log = Arc::clone(&log);
        client.config(
            ConfigUpdate::new().subscribe(EventKind::BeforeExecute, move |_| push(&log, "merged")),
        );
    }

    client
        .execute(&Statement::new("SELECT 1", vec![]))
        .await
        .unwrap();

    // Merged subscriptions are appended after existing ones.
    assert_eq!(log.lock().unwrap().as_slice(), ["direct", "merged"]);
}

#[tokio::test]
async fn raw_statement_round_trip() {
    let driver = Arc::new(MockDriver::returning(vec![
        row(json!({"id": 1, "name": "alice"})),
        row(json!({"id": 2, "name": "bob"})),
    ]));
    let client = ChClient::with_driver(Arc::clone(&driver) as Arc<dyn Driver>);

    let statement = client.sql(
        "SELECT id, name FROM users WHERE name = ?",
        vec![SqlValue::from("alice")],
    );
    let rows = client.execute(&statement).await.unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].try_get::<String>("name").unwrap(), "alice");
    assert_eq!(
        driver.executed(),
        ["SELECT id, name FROM users WHERE name = 'alice'"]
    );
}

// ── Factory guard ──

struct RefusingDriver;

#[async_trait::async_trait]
impl Driver for RefusingDriver {
    async fn execute(&self, _sql: &str) -> ChResult<Vec<Row>> {
        Ok(vec![])
    }
}

impl Connect for RefusingDriver {
    fn connect(_options: &ClientOptions) -> ChResult<Self> {
        Err(ChError::execution("dns lookup failed: no such host"))
    }
}

struct AcceptingDriver;

#[async_trait::async_trait]
impl Driver for AcceptingDriver {
    async fn execute(&self, _sql: &str) -> ChResult<Vec<Row>> {
        Ok(vec![])
    }
}

impl Connect for AcceptingDriver {
    fn connect(options: &ClientOptions) -> ChResult<Self> {
        assert!(!options.url.is_empty());
        Ok(Self)
    }
}

#[test]
fn connect_with_empty_options_is_a_configuration_error() {
    let err = ChClient::connect::<AcceptingDriver>(ClientOptions::default()).unwrap_err();
    assert!(err.is_configuration());
    assert_eq!(
        err.to_string(),
        "Configuration error: initialization options must not be empty"
    );
}

#[test]
fn driver_construction_failure_is_reported_generically() {
    let options = ClientOptions::new("http://localhost:8123");
    let err = ChClient::connect::<RefusingDriver>(options).unwrap_err();
    assert!(err.is_configuration());
    // The underlying cause is not preserved in the message.
    let message = err.to_string();
    assert_eq!(
        message,
        "Configuration error: initialization options are invalid"
    );
    assert!(!message.contains("dns lookup failed"));
}

#[test]
fn connect_with_valid_options_succeeds() {
    let options = ClientOptions::new("http://localhost:8123")
        .with_database("analytics")
        .with_user("reader");
    assert!(ChClient::connect::<AcceptingDriver>(options).is_ok());
}
