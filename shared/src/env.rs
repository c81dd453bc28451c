/// Loads the `.env` file if one is present next to the binary.
/// Missing files are fine, the process environment wins either way.
pub fn init() {
    _ = dotenv::dotenv();
}
