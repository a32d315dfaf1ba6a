use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use tawsil::injectable;
use tawsil::prelude::*;

pub struct Database {
    url: String,
}

#[injectable]
impl Database {
    fn new(#[inject(default = String::from("sqlite::memory:"))] url: String) -> Self {
        Self { url }
    }

    fn url(&self) -> String {
        self.url.clone()
    }
}

pub struct HelloWorld {
    foo: String,
}

#[injectable]
impl HelloWorld {
    fn new(foo: String) -> Self {
        Self { foo }
    }

    fn get_foo(&self, suffix: &str) -> String {
        format!("{}{suffix}", self.foo)
    }

    fn describe(#[inject(name = "label")] text: String) -> String {
        format!("HelloWorld: {text}")
    }

    #[inject(skip)]
    fn rename(&mut self, foo: String) {
        self.foo = foo;
    }
}

pub struct Session {
    id: String,
}

pub trait Greeter: Send + Sync {
    fn greet(&self) -> String;
}

struct English;

impl Greeter for English {
    fn greet(&self) -> String {
        "hello".to_string()
    }
}

#[injectable]
fn greet(foo: String, hello: String, temp: String) -> String {
    format!("{foo}-{hello}-{temp}")
}

#[injectable]
fn with_default(#[inject(default = String::from("bar"))] foo: String) -> String {
    foo
}

#[injectable]
fn shout(#[inject(default = "baz")] temp: &str) -> String {
    temp.to_uppercase()
}

#[injectable]
fn session_id(session: Arc<Session>) -> String {
    session.id.clone()
}

#[injectable]
fn database_url(db: Arc<Database>) -> String {
    db.url.clone()
}

#[injectable(name = "label_length")]
fn label_len(#[inject(kind = "Label")] label: String) -> usize {
    label.len()
}

#[injectable]
fn untyped_url(#[inject(untyped)] db: Arc<Database>) -> String {
    db.url.clone()
}

#[injectable]
fn welcome(greeter: Arc<dyn Greeter>) -> String {
    greeter.greet()
}

#[injectable]
fn open_database(url: String) -> Arc<Database> {
    Arc::new(Database { url })
}

#[injectable(fallible)]
fn connect(url: String) -> std::result::Result<Database, String> {
    if url.starts_with("postgres://") {
        Ok(Database { url })
    } else {
        Err(format!("unsupported url {url}"))
    }
}

fn text(value: Value) -> String {
    value.cloned::<String>().unwrap()
}

#[test]
fn explicit_args_override_bindings() {
    let container = Container::new();
    container.bind("foo", Value::new(String::from("bar"))).unwrap();
    container.bind("hello", Value::new(String::from("world"))).unwrap();

    let args = Args::new().with("temp", Value::new(String::from("baz")));
    let out = container.invoke(greet_invocable(), args).unwrap();
    assert_eq!(text(out), "bar-world-baz");
}

#[test]
fn default_fallback_and_missing_dependency() {
    let container = Container::new();
    assert_eq!(text(container.call(with_default_invocable()).unwrap()), "bar");

    match container.call(greet_invocable()).unwrap_err() {
        TawsilError::NotFound(inner) => assert_eq!(inner.identifier(), "foo"),
        other => panic!("Expected NotFound, got: {other:?}"),
    }
}

#[test]
fn str_parameter_falls_back_to_literal_default() {
    let container = Container::new();
    assert_eq!(text(container.call(shout_invocable()).unwrap()), "BAZ");

    container.bind("temp", Value::new(String::from("qux"))).unwrap();
    assert_eq!(text(container.call(shout_invocable()).unwrap()), "QUX");
}

#[test]
fn typed_resolver_is_cached_across_calls() {
    let container = Container::new();
    let calls = Arc::new(AtomicU32::new(0));
    {
        let calls = calls.clone();
        container.add_typed_resolver(
            Kind::of::<Session>(),
            move |id: &str, _: &Container| -> Result<Option<Value>> {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(Some(Value::new(Session { id: id.to_string() })))
            },
        );
    }

    assert_eq!(text(container.call(session_id_invocable()).unwrap()), "session");
    assert_eq!(text(container.call(session_id_invocable()).unwrap()), "session");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(container.cached("session", "Session").is_some());
}

#[test]
fn alias_wins_over_name_binding() {
    let container = Container::new();
    container
        .bind("primary", Value::new(Database { url: "postgres://primary".into() }))
        .unwrap();
    container
        .bind("db", Value::new(Database { url: "by-name".into() }))
        .unwrap();

    assert_eq!(text(container.call(database_url_invocable()).unwrap()), "by-name");

    container.alias("primary", "Database").unwrap();
    assert_eq!(text(container.call(database_url_invocable()).unwrap()), "postgres://primary");
}

#[test]
fn kind_and_name_options() {
    let container = Container::new();
    container.add_typed_resolver("Label", |id: &str, _: &Container| -> Result<Option<Value>> {
        Ok(Some(Value::new(format!("<{id}>"))))
    });

    let invocable = label_len_invocable();
    assert_eq!(invocable.name(), "label_length");
    assert_eq!(container.call(invocable).unwrap().cloned::<usize>().unwrap(), 7);
}

#[test]
fn untyped_parameter_uses_untyped_resolvers() {
    let container = Container::new();
    container.add_typed_resolver("Database", |_: &str, _: &Container| -> Result<Option<Value>> {
        Ok(Some(Value::new(Database { url: "typed".into() })))
    });
    container.add_resolver(|_: &str, _: &Container| -> Result<Option<Value>> {
        Ok(Some(Value::new(Database { url: "untyped".into() })))
    });

    assert_eq!(text(container.call(untyped_url_invocable()).unwrap()), "untyped");
    assert_eq!(text(container.call(database_url_invocable()).unwrap()), "typed");
}

#[test]
fn trait_objects_are_passed_as_is() {
    let container = Container::new();
    container
        .bind("greeter", Value::new(Arc::new(English) as Arc<dyn Greeter>))
        .unwrap();

    assert_eq!(text(container.call(welcome_invocable()).unwrap()), "hello");
}

#[test]
fn arc_results_are_shared_not_wrapped() {
    let container = Container::new();
    container.bind("url", Value::new(String::from("x"))).unwrap();
    container.singleton("db", open_database_invocable()).unwrap();

    let db = container.get_shared::<Database>("db").unwrap();
    assert_eq!(db.url, "x");
    assert!(Arc::ptr_eq(&db, &container.get_shared::<Database>("db").unwrap()));
}

#[test]
fn fallible_errors_become_construction_failures() {
    let container = Container::new();

    let ok = container
        .invoke(
            connect_invocable(),
            Args::positional([Value::new(String::from("postgres://db"))]),
        )
        .unwrap();
    assert!(ok.is::<Database>());

    let err = container
        .invoke(
            connect_invocable(),
            Args::positional([Value::new(String::from("mysql://db"))]),
        )
        .unwrap_err();
    match err {
        TawsilError::ConstructionFailed { target, source } => {
            assert_eq!(target, "connect");
            assert!(source.to_string().contains("mysql://db"));
        }
        other => panic!("Expected ConstructionFailed, got: {other:?}"),
    }
}

#[test]
fn constructor_then_method_on_instance() {
    let container = Container::new();
    container.bind("foo", Value::new(String::from("bar"))).unwrap();
    container.bind("suffix", Value::new(String::from("!"))).unwrap();

    let instance = container.call(Target::constructor("HelloWorld")).unwrap();
    let out = container
        .call(Target::method(Owner::instance(instance), "get_foo"))
        .unwrap();
    assert_eq!(text(out), "bar!");
}

#[test]
fn instance_method_on_type_passes_args_to_constructor() {
    let container = Container::new();
    container.bind("suffix", Value::new(String::from("?"))).unwrap();

    let args = Args::new().with("foo", Value::new(String::from("ctor")));
    let out = container
        .invoke(Target::method(Owner::of_type("HelloWorld"), "get_foo"), args)
        .unwrap();
    assert_eq!(text(out), "ctor?");
}

#[test]
fn static_method_with_renamed_parameter() {
    let container = Container::new();
    container.bind("label", Value::new(String::from("x"))).unwrap();

    let out = container
        .call(Target::method(Owner::of_type("HelloWorld"), "describe"))
        .unwrap();
    assert_eq!(text(out), "HelloWorld: x");
}

#[test]
fn skipped_methods_stay_out_of_the_spec() {
    let container = Container::new();
    let spec = container.type_spec("HelloWorld").unwrap();
    assert!(spec.method("get_foo").is_some());
    assert!(spec.method("describe").unwrap().is_static());
    assert!(spec.method("rename").is_none());

    let mut hello = HelloWorld::new("a".into());
    hello.rename("b".into());
    assert_eq!(hello.get_foo("c"), "bc");
}

#[test]
fn singleton_self_uses_generated_constructor() {
    let container = Container::new();
    container.singleton_self("Database").unwrap();

    let a = container.get_shared::<Database>("Database").unwrap();
    let b = container.get_shared::<Database>("Database").unwrap();
    assert_eq!(a.url, "sqlite::memory:");
    assert!(Arc::ptr_eq(&a, &b));

    let url = container
        .call(Target::method(Owner::instance(Value::from_arc(a)), "url"))
        .unwrap();
    assert_eq!(text(url), "sqlite::memory:");
}

#[test]
fn linked_types_can_be_left_out() {
    let container = Container::builder().register_linked_types(false).build();
    assert!(!container.has_type("Database"));

    container.register::<Database>();
    assert!(container.has_type("Database"));
    assert!(Container::new().has_type("HelloWorld"));
}
