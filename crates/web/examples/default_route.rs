use nano_web::{Router, Server, SourceMode};
use tracing::Dispatch;
use tracing_subscriber::FmtSubscriber;

// curl -v http://127.0.0.1:3000/
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let mut router = Router::new();
    router.add_default_route();

    // only connection workers log through this subscriber
    let dispatch = Dispatch::new(FmtSubscriber::builder().with_max_level(tracing::Level::TRACE).finish());

    Server::builder()
        .router(router)
        .address("127.0.0.1:3000")
        .source_mode(SourceMode::ByteByByte)
        .dispatch(dispatch)
        .build()
        .unwrap()
        .start()
        .await
        .unwrap();
}
