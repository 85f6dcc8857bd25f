use cucumber::World;
use cucumber_tests::features::MostradorWorld;

#[tokio::main]
async fn main() {
    MostradorWorld::cucumber().run_and_exit("features/").await;
}
