
fn init() {
  let _ = pretty_env_logger::env_logger::Builder::from_env(
    pretty_env_logger::env_logger::Env::default().default_filter_or("info"),
  )
  .is_test(true)
  .try_init();
}
