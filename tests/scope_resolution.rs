use std::panic::{self, AssertUnwindSafe};

use verso::middleware::Next;
use verso::{Api, BoxFuture, ConfigError, Error, Format, Helper, Request, Scope};

fn passthrough(req: Request, next: Next) -> BoxFuture {
    next.run(req)
}

fn middleware_ids(api: &Api) -> Vec<String> {
    api.scope().middlewares().iter().map(|m| m.id().to_owned()).collect()
}

struct Paginator;
impl Helper for Paginator {}

struct Clock;
impl Helper for Clock {}

#[test]
fn override_keys_use_version_value_inside_and_global_outside() -> Result<(), Error> {
    let mut api = Api::new();
    api.prefix("/api").respond_to(["json"])?;

    api.version("v1", |v1| {
        v1.prefix("/internal").respond_to(["xml"])?;
        v1.basic_auth("v1", |_, _| true);
        assert_eq!(v1.scope().prefix(), "/internal");
        assert_eq!(v1.scope().formats(), vec!["xml".parse::<Format>()?]);
        assert!(v1.scope().auth().is_some());
        Ok(())
    })?;

    assert_eq!(api.scope().active(), &Scope::Global);
    assert_eq!(api.scope().prefix(), "/api");
    assert_eq!(api.scope().formats(), vec![Format::JSON]);
    assert!(api.scope().auth().is_none());
    Ok(())
}

#[test]
fn unset_version_keys_fall_back_to_global() -> Result<(), Error> {
    let mut api = Api::new();
    api.prefix("/api");
    api.version("v1", |v1| {
        assert_eq!(v1.scope().prefix(), "/api");
        assert_eq!(v1.scope().formats(), Format::DEFAULTS.to_vec());
        assert!(v1.scope().version().is_none());
        Ok(())
    })?;
    Ok(())
}

#[test]
fn middlewares_merge_global_first() -> Result<(), Error> {
    let mut api = Api::new();
    api.use_middleware("A", passthrough);

    api.version("v1", |v1| {
        v1.use_middleware("B", passthrough);
        assert_eq!(middleware_ids(v1), ["A", "B"]);
        Ok(())
    })?;
    api.version("v2", |v2| {
        assert_eq!(middleware_ids(v2), ["A"]);
        Ok(())
    })?;
    api.version("v3", |v3| {
        v3.use_middleware("C", passthrough).use_middleware("A", passthrough);
        assert_eq!(middleware_ids(v3), ["A", "C"]);
        Ok(())
    })?;

    assert_eq!(middleware_ids(&api), ["A"]);
    Ok(())
}

#[test]
fn helpers_merge_without_duplicates() -> Result<(), Error> {
    let mut api = Api::new();
    api.helper(Paginator);
    api.version("v1", |v1| {
        v1.helper(Clock).helper(Paginator);
        let names: Vec<&str> = v1.scope().helpers().iter().map(|h| h.name()).collect();
        assert_eq!(names.len(), 2);
        assert!(names[0].ends_with("Paginator"));
        assert!(names[1].ends_with("Clock"));
        Ok(())
    })?;
    Ok(())
}

#[test]
fn repeated_version_extends_and_last_override_wins() -> Result<(), Error> {
    let mut api = Api::new();
    api.version("v1", |v1| {
        v1.prefix("/a").use_middleware("first", passthrough);
        Ok(())
    })?;
    api.version("v1", |v1| {
        v1.prefix("/b").use_middleware("second", passthrough);
        assert_eq!(v1.scope().prefix(), "/b");
        assert_eq!(middleware_ids(v1), ["first", "second"]);
        assert_eq!(v1.mount_path("users"), "/b/v1/users");
        Ok(())
    })?;
    Ok(())
}

#[test]
fn failing_block_leaves_global_scope_active() {
    let mut api = Api::new();
    let err = api
        .version("v1", |v1| {
            v1.prefix("/broken");
            v1.respond_to(["no-such-format"])?;
            Ok(())
        })
        .unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::UnknownFormat(_))));

    assert_eq!(api.scope().active(), &Scope::Global);
    api.prefix("/after");
    assert_eq!(api.scope().global().prefix(), Some("/after"));
    assert_eq!(api.mount_path("users"), "/after/users");
}

#[test]
fn panicking_block_leaves_global_scope_active() {
    let mut api = Api::new();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let _ = api.version("v1", |_| panic!("block failed"));
    }));
    assert!(outcome.is_err());

    assert_eq!(api.scope().active(), &Scope::Global);
    api.prefix("/global");
    assert_eq!(api.scope().global().prefix(), Some("/global"));
}

#[test]
fn versions_cannot_nest() {
    let mut api = Api::new();
    let err = api
        .version("v1", |v1| {
            v1.version("v2", |_| Ok(()))?;
            Ok(())
        })
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Config(ConfigError::NestedVersion { ref outer, ref inner }) if outer == "v1" && inner == "v2"
    ));
    assert_eq!(api.scope().active(), &Scope::Global);
}

#[test]
fn version_names_are_validated() {
    let mut api = Api::new();
    assert!(matches!(
        api.version("  ", |_| Ok(())),
        Err(Error::Config(ConfigError::InvalidVersionName(_)))
    ));
    assert_eq!(api.scope().active(), &Scope::Global);
}
