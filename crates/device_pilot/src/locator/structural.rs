//! Structural locator: scroll-search with stall detection
//!
//! The view is first scrolled hard to its top, then searched screen by
//! screen. Termination relies on exact dump-text equality between two
//! consecutive scrolls: a false stall is harmless, a semantic diff could
//! loop forever.

use crate::channel::CommandChannel;
use crate::device::Device;
use crate::error::Result;
use crate::tree::{parse_dump, Point, Query, UiNode};
use tracing::debug;

impl<C: CommandChannel> Device<C> {
    /// Find the first node matching `pattern`, scrolling it into view if
    /// needed. `None` when scrolling stalls without a match.
    pub async fn find_node(&self, pattern: &str) -> Result<Option<UiNode>> {
        let query = Query::parse(pattern)?;

        self.key_repeat(&self.config.scroll_up_keycode, self.config.scroll_to_top_repeats)
            .await?;

        let mut previous = self.dump_ui().await?;
        loop {
            let root = parse_dump(&previous)?;
            if let Some(node) = query.first(&root) {
                debug!("pattern {:?} matched node <{}>", pattern, node.tag);
                return Ok(Some(node.clone()));
            }

            self.key_repeat(&self.config.scroll_down_keycode, self.config.scroll_step_repeats)
                .await?;

            let current = self.dump_ui().await?;
            if current == previous {
                debug!("scroll stalled without a match for {:?}", pattern);
                return Ok(None);
            }
            previous = current;
        }
    }

    /// Center point of the first node matching `pattern`.
    pub async fn find_node_center(&self, pattern: &str) -> Result<Option<Point>> {
        match self.find_node(pattern).await? {
            Some(node) => Ok(Some(node.center()?)),
            None => Ok(None),
        }
    }
}
