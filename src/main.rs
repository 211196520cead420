use portfolio_visuals::{App, init_logging};

fn main() {
	init_logging();
	leptos::mount::mount_to_body(App);
}
