fn main() {
    env_logger::init();

    if let Err(err) = stagehand::run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}
