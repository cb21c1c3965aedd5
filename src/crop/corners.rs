//! Corner voting for the background color
//!
//! A uniform border makes each corner agree with both of its neighbours, so
//! the corner whose two adjacent edges have the smallest summed distance is
//! taken as the base color. Corners are evaluated top-left, top-right,
//! bottom-left, bottom-right and only a strictly smaller score replaces the
//! current winner.

use image::RgbaImage;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

use super::color::{distance, Argb};
use super::types::Result;
use super::BorderCropper;

/// Image corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// Evaluation order, earlier corners win ties
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Corner::TopLeft => "top-left",
            Corner::TopRight => "top-right",
            Corner::BottomLeft => "bottom-left",
            Corner::BottomRight => "bottom-right",
        }
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Distances along the four image edges
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EdgeDistances {
    pub top: f64,
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
}

/// Full record of one corner vote
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CornerVote {
    /// Corner colors in [`Corner::ALL`] order
    pub colors: [Argb; 4],
    pub edges: EdgeDistances,
    /// Summed adjacent-edge distance per corner, in [`Corner::ALL`] order
    pub scores: [f64; 4],
    pub winner: Corner,
}

impl CornerVote {
    /// Sample the corners of `image` and pick the base color.
    ///
    /// The image must be at least 1x1.
    pub(crate) fn sample(image: &RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        let top_left = Argb::from(*image.get_pixel(0, 0));
        let top_right = Argb::from(*image.get_pixel(width - 1, 0));
        let bottom_left = Argb::from(*image.get_pixel(0, height - 1));
        let bottom_right = Argb::from(*image.get_pixel(width - 1, height - 1));

        let edges = EdgeDistances {
            top: distance(top_left, top_right),
            left: distance(top_left, bottom_left),
            right: distance(top_right, bottom_right),
            bottom: distance(bottom_left, bottom_right),
        };
        debug!("Top left/right {} => {} = {:.3}", top_left, top_right, edges.top);
        debug!("Left top/bottom {} => {} = {:.3}", top_left, bottom_left, edges.left);
        debug!("Right top/bottom {} => {} = {:.3}", top_right, bottom_right, edges.right);
        debug!("Bottom left/right {} => {} = {:.3}", bottom_left, bottom_right, edges.bottom);

        let scores = [
            edges.top + edges.left,
            edges.top + edges.right,
            edges.left + edges.bottom,
            edges.right + edges.bottom,
        ];

        let mut best = 0;
        for (idx, &score) in scores.iter().enumerate().skip(1) {
            if score < scores[best] {
                best = idx;
            }
        }

        Self {
            colors: [top_left, top_right, bottom_left, bottom_right],
            edges,
            scores,
            winner: Corner::ALL[best],
        }
    }

    /// Color of the given corner
    pub fn color(&self, corner: Corner) -> Argb {
        self.colors[corner as usize]
    }

    /// Color of the winning corner
    pub fn base_color(&self) -> Argb {
        self.color(self.winner)
    }

    /// Score of the winning corner
    pub fn winning_score(&self) -> f64 {
        self.scores[self.winner as usize]
    }
}

impl BorderCropper {
    /// Run the corner vote and return the full record
    pub fn vote_corners(image: &RgbaImage) -> Result<CornerVote> {
        Self::check_dimensions(image)?;
        let vote = CornerVote::sample(image);
        info!(
            "Color {} selected as background ({}) with min distance of {:.3}",
            vote.base_color(),
            vote.winner,
            vote.winning_score()
        );
        Ok(vote)
    }

    /// Infer the background color from the four corners
    pub fn determine_base_color(image: &RgbaImage) -> Result<Argb> {
        Self::vote_corners(image).map(|vote| vote.base_color())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crop::CropError;
    use image::Rgba;

    fn with_corners(tl: Rgba<u8>, tr: Rgba<u8>, bl: Rgba<u8>, br: Rgba<u8>) -> RgbaImage {
        let mut img = RgbaImage::from_pixel(6, 4, Rgba([90, 90, 90, 255]));
        img.put_pixel(0, 0, tl);
        img.put_pixel(5, 0, tr);
        img.put_pixel(0, 3, bl);
        img.put_pixel(5, 3, br);
        img
    }

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);

    #[test]
    fn test_uniform_corners_pick_top_left() {
        let img = RgbaImage::from_pixel(8, 8, WHITE);
        let vote = BorderCropper::vote_corners(&img).unwrap();
        assert_eq!(vote.winner, Corner::TopLeft);
        assert_eq!(vote.base_color(), Argb::from(WHITE));
        assert_eq!(vote.winning_score(), 0.0);
    }

    #[test]
    fn test_three_matching_corners_outvote_one() {
        // Content touches the top-left corner only
        let img = with_corners(RED, WHITE, WHITE, WHITE);
        let vote = BorderCropper::vote_corners(&img).unwrap();
        // Bottom-right is the only corner whose neighbours both agree with it
        assert_eq!(vote.winner, Corner::BottomRight);
        assert_eq!(vote.base_color(), Argb::from(WHITE));
        assert_eq!(vote.scores[3], 0.0);
    }

    #[test]
    fn test_checkerboard_tie_prefers_top_left() {
        let img = with_corners(BLACK, WHITE, WHITE, BLACK);
        let vote = BorderCropper::vote_corners(&img).unwrap();
        assert!(vote.scores.iter().all(|&s| s == vote.scores[0]));
        assert_eq!(vote.winner, Corner::TopLeft);
        assert_eq!(
            BorderCropper::determine_base_color(&img).unwrap(),
            Argb::from(BLACK)
        );
    }

    #[test]
    fn test_tie_between_later_corners_prefers_earlier() {
        // Bottom row agrees, top row disagrees: bottom-left and bottom-right tie
        let img = with_corners(RED, GREEN, WHITE, WHITE);
        let vote = BorderCropper::vote_corners(&img).unwrap();
        assert_eq!(vote.scores[2], vote.scores[3]);
        assert!(vote.scores[2] < vote.scores[0]);
        assert!(vote.scores[2] < vote.scores[1]);
        assert_eq!(vote.winner, Corner::BottomLeft);
    }

    #[test]
    fn test_edge_distances() {
        let img = with_corners(WHITE, BLACK, WHITE, WHITE);
        let vote = BorderCropper::vote_corners(&img).unwrap();
        assert_eq!(vote.edges.left, 0.0);
        assert_eq!(vote.edges.bottom, 0.0);
        assert!(vote.edges.top > 0.0);
        assert_eq!(vote.edges.top, vote.edges.right);
        assert_eq!(vote.color(Corner::TopRight), Argb::from(BLACK));
    }

    #[test]
    fn test_single_pixel_image() {
        let img = RgbaImage::from_pixel(1, 1, RED);
        assert_eq!(BorderCropper::determine_base_color(&img).unwrap(), Argb::from(RED));
    }

    #[test]
    fn test_empty_image_rejected() {
        let img = RgbaImage::new(0, 3);
        assert!(matches!(
            BorderCropper::determine_base_color(&img),
            Err(CropError::DegenerateImage { width: 0, height: 3 })
        ));
    }

    #[test]
    fn test_corner_names() {
        assert_eq!(Corner::TopLeft.to_string(), "top-left");
        assert_eq!(Corner::BottomRight.name(), "bottom-right");
    }
}
