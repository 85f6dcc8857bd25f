use cucumber::{cli, World};
use cucumber_tests::features::MostradorWorld;

#[tokio::main]
async fn main() {
    MostradorWorld::cucumber()
        .with_cli::<()>(cli::Opts::parsed())
        .run_and_exit("features/")
        .await;
}
