use verso::middleware::Next;
use verso::{Api, BoxFuture, Error, Format, Helper, Request, Response, StageKind};

fn passthrough(req: Request, next: Next) -> BoxFuture {
    next.run(req)
}

async fn handler(_req: Request) -> Response {
    Response::text("ok")
}

struct Greeting;
impl Helper for Greeting {}

fn middleware(id: &str) -> StageKind {
    StageKind::Middleware(id.to_owned())
}

#[test]
fn stages_run_auth_then_format_then_middlewares() -> Result<(), Error> {
    let mut api = Api::new();
    api.basic_auth("staff", |_, _| true).use_middleware("A", passthrough);

    api.version("v1", |v1| {
        v1.use_middleware("B", passthrough);
        let pipeline = v1.pipeline(handler);
        assert_eq!(
            pipeline.stages(),
            vec![
                StageKind::Authenticate { realm: "staff".into() },
                StageKind::Format(vec![Format::JSON, Format::JSONP]),
                middleware("A"),
                middleware("B"),
            ]
        );
        Ok(())
    })?;
    Ok(())
}

#[test]
fn building_twice_gives_identical_pipelines() -> Result<(), Error> {
    let mut api = Api::new();
    api.basic_auth("staff", |_, _| true)
        .use_middleware("A", passthrough)
        .helper(Greeting)
        .respond_to(["json", "xml"])?;

    let first = api.pipeline(handler);
    let second = api.pipeline(handler);
    assert_eq!(first.stages(), second.stages());
    assert_eq!(first.helpers(), second.helpers());
    assert_eq!(first.helpers().len(), 1);
    Ok(())
}

#[test]
fn disabled_auth_only_affects_its_version() -> Result<(), Error> {
    let mut api = Api::new();
    api.basic_auth("staff", |_, _| true);

    api.version("public", |v| {
        v.no_auth();
        assert!(!v.pipeline(handler).stages().iter().any(|s| matches!(s, StageKind::Authenticate { .. })));
        Ok(())
    })?;
    api.version("private", |v| {
        assert!(matches!(v.pipeline(handler).stages()[0], StageKind::Authenticate { .. }));
        Ok(())
    })?;
    Ok(())
}

#[test]
fn version_formats_replace_global_formats() -> Result<(), Error> {
    let mut api = Api::new();
    api.respond_to(["json"])?;
    api.version("v1", |v1| {
        v1.respond_to(["xml", "xml"])?;
        assert_eq!(v1.pipeline(handler).stages(), vec![StageKind::Format(vec!["xml".parse()?])]);
        Ok(())
    })?;
    assert_eq!(api.pipeline(handler).stages(), vec![StageKind::Format(vec![Format::JSON])]);
    Ok(())
}

#[test]
fn stage_kinds_display() {
    assert_eq!(StageKind::Authenticate { realm: "staff".into() }.to_string(), "auth(staff)");
    assert_eq!(StageKind::Format(Format::DEFAULTS.to_vec()).to_string(), "format[json,jsonp]");
    assert_eq!(middleware("trace").to_string(), "use(trace)");
}
