use std::convert::Infallible;

use nano_web::{Method, Request, Response, Router, Server, StatusCode, make_handler, make_sync_handler};
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

async fn hello_world(request: Request) -> Result<Response, Infallible> {
    let name = request.header("User-Agent").unwrap_or("world");
    Ok(Response::ok(format!("hello {name}")))
}

fn echo(request: Request) -> Result<Response, Infallible> {
    let mut response = Response::with_body(StatusCode::Ok, request.body());
    response.add_header("X-Query", request.query_string().trim());
    Ok(response)
}

// curl -v http://127.0.0.1:3000/hello
// curl -v -X POST -d "ping" http://127.0.0.1:3000/echo
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::DEBUG).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let router = Router::new()
        .route(Method::Get, "/hello", make_handler(hello_world))
        .route(Method::Post, "/echo", make_sync_handler(echo));

    let server = match Server::builder().router(router).address("127.0.0.1:3000").build() {
        Ok(server) => server,
        Err(e) => {
            error!(cause = %e, "can't build server");
            return;
        }
    };

    info!("serving on 127.0.0.1:3000");
    if let Err(e) = server.start().await {
        error!(cause = %e, "server stopped");
    }
}
