use leptos::prelude::*;

use crate::components::force_graph::{ForceGraphCanvas, portfolio_descriptions, portfolio_graph};
use crate::components::visitor_map::VisitorMapCanvas;

/// Portfolio landing page: the course/artwork graph and the live visitor map.
#[component]
pub fn Home() -> impl IntoView {
	let graph_data = Signal::derive(portfolio_graph);

	view! {
		<main class="portfolio">
			<section class="nodelink">
				<h2>"Courses and Artworks"</h2>
				<p class="subtitle">
					"Click a node to see how it connects. Drag nodes to rearrange the layout."
				</p>
				<ForceGraphCanvas data=graph_data descriptions=portfolio_descriptions() />
			</section>
			<section class="visitors">
				<h2>"Live Visitors"</h2>
				<VisitorMapCanvas />
			</section>
		</main>
	}
}
