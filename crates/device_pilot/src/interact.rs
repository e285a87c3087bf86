//! Interaction dispatcher: the public locate/tap entry point
//!
//! A payload naming an existing local file routes to the visual locator;
//! anything else is treated as a structural pattern. Reaching the screen the
//! target lives on (launching apps, dismissing dialogs) is the caller's job.

use crate::channel::CommandChannel;
use crate::device::Device;
use crate::error::Result;
use crate::locator::VisualMatch;
use crate::tree::{Point, UiNode};
use std::path::Path;
use tracing::debug;

/// A located element: the matched screen region or dump node, plus its
/// derived center point.
#[derive(Debug, Clone)]
pub enum Located {
    Image(VisualMatch),
    Node { node: UiNode, center: Point },
}

impl Located {
    pub fn center(&self) -> Point {
        match self {
            Located::Image(found) => found.center(),
            Located::Node { center, .. } => *center,
        }
    }
}

impl<C: CommandChannel> Device<C> {
    /// Resolve `payload` to a located element, or `None` when absent.
    pub async fn locate_match(&self, payload: &str) -> Result<Option<Located>> {
        if Path::new(payload).is_file() {
            debug!("locating by reference image {:?}", payload);
            Ok(self.find_image(Path::new(payload)).await?.map(Located::Image))
        } else {
            debug!("locating by structural pattern {:?}", payload);
            match self.find_node(payload).await? {
                Some(node) => {
                    let center = node.center()?;
                    Ok(Some(Located::Node { node, center }))
                }
                None => Ok(None),
            }
        }
    }

    /// Resolve `payload` to the center point of the located element.
    pub async fn locate(&self, payload: &str) -> Result<Option<Point>> {
        Ok(self.locate_match(payload).await?.map(|found| found.center()))
    }

    /// Locate and tap. Returns `false`, with no tap issued, when the target
    /// is absent.
    pub async fn tap(&self, payload: &str) -> Result<bool> {
        match self.locate(payload).await? {
            Some(point) => {
                self.tap_at(point).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::fake::FakeChannel;
    use crate::config::TimingConfig;

    const ACK: &str = "UI hierchary dumped to: /sdcard/window_dump.xml";

    const SCREEN: &str = r#"<hierarchy rotation="0">
  <node class="android.widget.Button" text="OK" bounds="[100,200][300,400]"/>
</hierarchy>"#;

    fn device(channel: FakeChannel) -> Device<FakeChannel> {
        Device::new(channel).with_timing(TimingConfig::immediate())
    }

    fn structural_channel(dump: &str) -> FakeChannel {
        FakeChannel::new()
            .respond("uiautomator dump", ACK)
            .respond("cat /sdcard/window_dump.xml", dump)
    }

    #[tokio::test]
    async fn test_pattern_routes_to_structural_locator() {
        let device = device(structural_channel(SCREEN));
        let point = device.locate("//node[@text='OK']").await.unwrap().unwrap();
        assert_eq!(point, Point { x: 200, y: 300 });
        // Structural route touches the dump, never the raster pipeline.
        assert_eq!(device.channel().count_containing("screencap"), 0);
        assert_eq!(device.channel().count_containing("uiautomator dump"), 1);
    }

    #[tokio::test]
    async fn test_existing_file_routes_to_visual_locator() {
        use image::{GrayImage, Luma};

        let dir = tempfile::tempdir().unwrap();
        let frame = GrayImage::from_fn(100, 100, |x, y| {
            Luma([((x * y + x * 7 + y * 13) % 256) as u8])
        });
        let frame_path = dir.path().join("frame.png");
        frame.save(&frame_path).unwrap();

        let template = GrayImage::from_fn(40, 20, |x, y| *frame.get_pixel(x + 50, y + 60));
        let reference = dir.path().join("reference.png");
        template.save(&reference).unwrap();

        let channel = FakeChannel::new().serve_pull("/sdcard/capture.png", &frame_path);
        let device = device(channel);

        let point = device
            .locate(reference.to_str().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(point, Point { x: 70, y: 70 });
        assert_eq!(device.channel().count_containing("screencap"), 1);
        assert_eq!(device.channel().count_containing("uiautomator dump"), 0);
    }

    #[tokio::test]
    async fn test_tap_hits_located_center() {
        let device = device(structural_channel(SCREEN));
        assert!(device.tap("//node[@text='OK']").await.unwrap());
        assert_eq!(device.channel().count_containing("input tap 200 300"), 1);
    }

    #[tokio::test]
    async fn test_tap_absent_has_no_side_effect() {
        let device = device(structural_channel(SCREEN));
        assert!(!device.tap("//node[@text='Cancel']").await.unwrap());
        assert_eq!(device.channel().count_containing("input tap"), 0);
    }

    #[tokio::test]
    async fn test_locate_match_carries_node() {
        let device = device(structural_channel(SCREEN));
        let found = device.locate_match("//node[@text='OK']").await.unwrap().unwrap();
        match found {
            Located::Node { node, center } => {
                assert_eq!(node.attr("class"), Some("android.widget.Button"));
                assert_eq!(center, Point { x: 200, y: 300 });
            }
            Located::Image(_) => panic!("expected a structural match"),
        }
    }
}
