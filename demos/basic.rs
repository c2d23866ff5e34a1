//! Two API versions sharing global settings.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example basic
//!
//! Try:
//!   curl -u admin:secret http://localhost:3000/api/v1/users/42
//!   curl -u admin:secret http://localhost:3000/api/v1/users/42.jsonp?callback=show
//!   curl http://localhost:3000/api/v2/users/42.xml
//!   curl -X DELETE -u admin:secret http://localhost:3000/api/v1/users/42

use http::{Method, StatusCode};
use verso::middleware::{Next, Trace};
use verso::{Api, Error, Format, Helper, Request, Requirements, Response, Server};

struct Presenter;

impl Helper for Presenter {}

impl Presenter {
    fn user(&self, id: &str, format: Option<Format>) -> Response {
        match format.map(Format::name) {
            Some("xml") => Response::builder()
                .bytes("application/xml", format!("<user><id>{id}</id></user>")),
            _ => Response::json(format!(r#"{{"id":"{id}","name":"alice"}}"#)),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt::init();

    let mut api = Api::new();
    api.prefix("/api")
        .use_middleware("trace", Trace)
        .helper(Presenter)
        .basic_auth("demo", |user, password| user == "admin" && password == "secret");

    api.version("v1", |v1| {
        let numeric = Requirements::new().param("id", r"\d+")?;
        v1.route(Method::GET, "users/{id}", numeric.clone(), get_user)?
            .route(Method::DELETE, "users/{id}", numeric, delete_user)?
            .post("users", create_user)?;
        Ok(())
    })?;

    api.version("v2", |v2| {
        v2.no_auth()
            .respond_to(["json", "xml"])?
            .use_middleware("api-version", |req: Request, next: Next| async move {
                let mut res = next.run(req).await;
                res.set_header("x-api-version", "2");
                res
            })
            .get("users/{id}", get_user)?;
        Ok(())
    })?;

    Server::bind("0.0.0.0:3000")?.serve(api.into_app()).await
}

// GET /api/{version}/users/{id}
async fn get_user(req: Request) -> Response {
    let id = req.param("id").unwrap_or("unknown");
    match req.helper::<Presenter>() {
        Some(presenter) => presenter.user(id, req.format()),
        None => Response::status(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

// POST /api/v1/users
async fn create_user(req: Request) -> Response {
    if req.body().is_empty() {
        return Response::status(StatusCode::BAD_REQUEST);
    }
    Response::builder()
        .status(StatusCode::CREATED)
        .header("location", "/api/v1/users/99")
        .json(r#"{"id":"99","name":"new_user"}"#)
}

// DELETE /api/v1/users/{id} → 204 No Content
async fn delete_user(_req: Request) -> StatusCode {
    StatusCode::NO_CONTENT
}
