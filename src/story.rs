//! Session state for the 4-panel story composite.
//!
//! The story canvas is four fixed-height bands of `STORY_HEIGHT / 4` each.
//! Bands 1, 2 and 4 hold independently panned/zoomed photos; band 3 carries
//! only vehicle data. The draggable separators between bands are cosmetic:
//! they move within a bounded band around their defaults, but the photo crop
//! rectangles never change with them. That decoupling is deliberate — divider
//! placement is a visual accent, cropping stays stable.
//!
//! The state is a plain value: interaction handlers call the pure `with_*` /
//! `drag_separator` updates and keep the result; nothing here mutates in
//! place. The serialized shape is versioned, and [`StoryState::migrate`]
//! upgrades session blobs from the older `splits` layout.

use serde::{Deserialize, Serialize};

use crate::geometry::{Rect, Transform};

/// Story canvas width in pixels.
pub const STORY_WIDTH: u32 = 1080;
/// Story canvas height in pixels.
pub const STORY_HEIGHT: u32 = 1920;
/// Height of each of the four bands.
pub const BLOCK_HEIGHT: f32 = STORY_HEIGHT as f32 / 4.0;
/// How far a separator may travel from its default position.
pub const SEPARATOR_BAND: f32 = 140.0;
/// Minimum distance kept between consecutive separators.
pub const MIN_SEPARATOR_GAP: f32 = 120.0;
/// Rendered thickness of a separator bar.
pub const SEPARATOR_THICKNESS: f32 = 8.0;

/// Block ids that carry a photo (block 3 is data-only).
pub const PHOTO_BLOCKS: [u8; 3] = [1, 2, 4];

const CURRENT_VERSION: u32 = 2;

/// Default position of separator `i` (0-based): the fixed grid boundary.
pub fn default_separator(i: usize) -> f32 {
    (i as f32 + 1.0) * BLOCK_HEIGHT
}

/// Crop rectangle of a story block, on the fixed H/4 grid. Separator
/// positions never influence this.
pub fn block_rect(id: u8) -> Rect {
    let row = (id.clamp(1, 4) - 1) as f32;
    Rect::new(0.0, row * BLOCK_HEIGHT, STORY_WIDTH as f32, BLOCK_HEIGHT)
}

/// Which block a y coordinate falls into, on the fixed grid (1..=4).
/// Hit-testing ignores separators for the same reason cropping does.
pub fn block_from_y(y: f32) -> u8 {
    let idx = (y / BLOCK_HEIGHT).floor() as i32 + 1;
    idx.clamp(1, 4) as u8
}

/// Visual separator positions, each bounded to `±SEPARATOR_BAND` around its
/// default and kept `MIN_SEPARATOR_GAP` apart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Separators {
    pub s1: f32,
    pub s2: f32,
    pub s3: f32,
}

impl Default for Separators {
    fn default() -> Self {
        Self {
            s1: default_separator(0),
            s2: default_separator(1),
            s3: default_separator(2),
        }
    }
}

impl Separators {
    pub fn as_array(&self) -> [f32; 3] {
        [self.s1, self.s2, self.s3]
    }

    /// Enforce the band and gap constraints. Non-finite values snap back to
    /// their defaults. The band geometry alone keeps separators ordered
    /// (bands are 480 apart, travel is ±140), the gap pass is the backstop.
    pub fn clamped(&self) -> Separators {
        let mut vals = self.as_array();
        for (i, v) in vals.iter_mut().enumerate() {
            let def = default_separator(i);
            if !v.is_finite() {
                *v = def;
            }
            *v = v.clamp(def - SEPARATOR_BAND, def + SEPARATOR_BAND);
        }
        for i in 1..3 {
            if vals[i] < vals[i - 1] + MIN_SEPARATOR_GAP {
                vals[i] = vals[i - 1] + MIN_SEPARATOR_GAP;
            }
        }
        Separators {
            s1: vals[0],
            s2: vals[1],
            s3: vals[2],
        }
    }
}

/// Per-photo-block state: which uploaded image it shows and its view.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlockState {
    pub image_index: usize,
    pub transform: Transform,
}

/// The three photo blocks, keyed by their on-canvas block id.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoryBlocks {
    #[serde(rename = "1")]
    pub block1: BlockState,
    #[serde(rename = "2")]
    pub block2: BlockState,
    #[serde(rename = "4")]
    pub block4: BlockState,
}

/// Full story session state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoryState {
    pub version: u32,
    pub active_block: u8,
    pub separators: Separators,
    pub blocks: StoryBlocks,
}

impl Default for StoryState {
    fn default() -> Self {
        StoryState::new(3)
    }
}

impl StoryState {
    /// Fresh state for a batch of `image_count` uploads: blocks 1, 2, 4 take
    /// images 0, 1, 2 (reusing the last image when fewer are available).
    pub fn new(image_count: usize) -> Self {
        let last = image_count.saturating_sub(1);
        let assign = |i: usize| BlockState {
            image_index: i.min(last),
            transform: Transform::default(),
        };
        Self {
            version: CURRENT_VERSION,
            active_block: 1,
            separators: Separators::default(),
            blocks: StoryBlocks {
                block1: assign(0),
                block2: assign(1),
                block4: assign(2),
            },
        }
    }

    pub fn block(&self, id: u8) -> Option<&BlockState> {
        match id {
            1 => Some(&self.blocks.block1),
            2 => Some(&self.blocks.block2),
            4 => Some(&self.blocks.block4),
            _ => None,
        }
    }

    /// Pure update of one photo block; ids other than 1/2/4 are a no-op.
    fn with_block(&self, id: u8, update: impl FnOnce(BlockState) -> BlockState) -> StoryState {
        let mut next = *self;
        match id {
            1 => next.blocks.block1 = update(self.blocks.block1),
            2 => next.blocks.block2 = update(self.blocks.block2),
            4 => next.blocks.block4 = update(self.blocks.block4),
            _ => {}
        }
        next
    }

    pub fn with_block_image(&self, id: u8, image_index: usize) -> StoryState {
        self.with_block(id, |b| BlockState { image_index, ..b })
    }

    pub fn with_block_pan(&self, id: u8, dx: f32, dy: f32) -> StoryState {
        self.with_block(id, |b| BlockState {
            transform: b.transform.panned(dx, dy),
            ..b
        })
    }

    pub fn with_block_zoom(&self, id: u8, zoom: f32) -> StoryState {
        self.with_block(id, |b| BlockState {
            transform: b.transform.zoomed(zoom),
            ..b
        })
    }

    /// Mark a block as the interaction target (any of 1..=4).
    pub fn select_block(&self, id: u8) -> StoryState {
        StoryState {
            active_block: id.clamp(1, 4),
            ..*self
        }
    }

    /// Pure separator drag: move separator `index` (0..3) by `dy`, then apply
    /// the band/gap clamp to the whole set.
    pub fn drag_separator(&self, index: usize, dy: f32) -> StoryState {
        let dy = if dy.is_finite() { dy } else { 0.0 };
        let mut vals = self.separators.as_array();
        if let Some(v) = vals.get_mut(index) {
            *v += dy;
        }
        StoryState {
            separators: Separators {
                s1: vals[0],
                s2: vals[1],
                s3: vals[2],
            }
            .clamped(),
            ..*self
        }
    }

    /// Clamp everything to valid ranges and stamp the current version.
    pub fn sanitized(&self) -> StoryState {
        StoryState {
            version: CURRENT_VERSION,
            active_block: self.active_block.clamp(1, 4),
            separators: self.separators.clamped(),
            blocks: self.blocks,
        }
    }

    /// Upgrade a stored session blob to the current shape.
    ///
    /// Version 1 kept divider positions under `splits` and image indices
    /// under `imgIndex`; both are mapped onto the current fields. Anything
    /// unreadable falls back to defaults rather than failing the session.
    pub fn migrate(value: &serde_json::Value) -> StoryState {
        if value.get("separators").is_some() {
            return serde_json::from_value::<StoryState>(value.clone())
                .map(|s| s.sanitized())
                .unwrap_or_default();
        }

        let mut state = StoryState::default();
        if let Some(splits) = value.get("splits") {
            if let Ok(separators) = serde_json::from_value::<Separators>(splits.clone()) {
                state.separators = separators.clamped();
            }
        }
        if let Some(active) = value.get("activeBlockId").and_then(|v| v.as_u64()) {
            state.active_block = (active as u8).clamp(1, 4);
        }
        if let Some(blocks) = value.get("blocks") {
            for id in PHOTO_BLOCKS {
                let Some(block) = blocks.get(id.to_string()) else {
                    continue;
                };
                let image_index = block
                    .get("imgIndex")
                    .or_else(|| block.get("imageIndex"))
                    .and_then(|v| v.as_u64())
                    .unwrap_or(0) as usize;
                let transform = block
                    .get("transform")
                    .and_then(|t| serde_json::from_value::<Transform>(t.clone()).ok())
                    .unwrap_or_default();
                state = state.with_block(id, |_| BlockState {
                    image_index,
                    transform,
                });
            }
        }
        state.sanitized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_assigns_first_three_images() {
        let s = StoryState::new(3);
        assert_eq!(s.blocks.block1.image_index, 0);
        assert_eq!(s.blocks.block2.image_index, 1);
        assert_eq!(s.blocks.block4.image_index, 2);
    }

    #[test]
    fn new_reuses_last_image_when_short() {
        let s = StoryState::new(1);
        assert_eq!(s.blocks.block1.image_index, 0);
        assert_eq!(s.blocks.block2.image_index, 0);
        assert_eq!(s.blocks.block4.image_index, 0);
    }

    #[test]
    fn block_rects_are_fixed_quarters() {
        for id in 1..=4u8 {
            let r = block_rect(id);
            assert_eq!(r.h, BLOCK_HEIGHT);
            assert_eq!(r.y, (id - 1) as f32 * BLOCK_HEIGHT);
            assert_eq!(r.w, STORY_WIDTH as f32);
        }
    }

    #[test]
    fn block_rects_ignore_separator_state() {
        let dragged = StoryState::new(3)
            .drag_separator(0, 9999.0)
            .drag_separator(2, -9999.0);
        // State carries moved separators, the grid does not move.
        assert_ne!(dragged.separators, Separators::default());
        for id in 1..=4u8 {
            assert_eq!(block_rect(id).h, BLOCK_HEIGHT);
        }
    }

    #[test]
    fn hit_testing_uses_fixed_grid() {
        assert_eq!(block_from_y(0.0), 1);
        assert_eq!(block_from_y(BLOCK_HEIGHT - 0.5), 1);
        assert_eq!(block_from_y(BLOCK_HEIGHT), 2);
        assert_eq!(block_from_y(BLOCK_HEIGHT * 2.0), 3);
        assert_eq!(block_from_y(BLOCK_HEIGHT * 3.0), 4);
        assert_eq!(block_from_y(BLOCK_HEIGHT * 4.0 - 0.5), 4);
        // Out of range clamps.
        assert_eq!(block_from_y(-50.0), 1);
        assert_eq!(block_from_y(1e6), 4);
    }

    #[test]
    fn separators_stay_ordered_and_banded_under_any_drags() {
        let mut s = StoryState::new(3);
        let drags: &[(usize, f32)] = &[
            (0, 500.0),
            (1, -500.0),
            (2, -10000.0),
            (0, -3.0),
            (1, 10000.0),
            (2, f32::NAN),
            (0, 77.7),
            (1, -77.7),
        ];
        for &(i, dy) in drags {
            s = s.drag_separator(i, dy);
            let [s1, s2, s3] = s.separators.as_array();
            assert!(s1 < s2 && s2 < s3, "ordering broke: {s1} {s2} {s3}");
            for (i, v) in [s1, s2, s3].iter().enumerate() {
                let def = default_separator(i);
                assert!(
                    (def - SEPARATOR_BAND..=def + SEPARATOR_BAND).contains(v),
                    "separator {i} out of band: {v}"
                );
            }
            assert!(s2 - s1 >= MIN_SEPARATOR_GAP);
            assert!(s3 - s2 >= MIN_SEPARATOR_GAP);
        }
    }

    #[test]
    fn clamp_is_idempotent() {
        let once = Separators {
            s1: 100.0,
            s2: 5000.0,
            s3: f32::NAN,
        }
        .clamped();
        assert_eq!(once, once.clamped());
    }

    #[test]
    fn updates_are_pure() {
        let s = StoryState::new(3);
        let s2 = s
            .with_block_pan(1, 10.0, 5.0)
            .with_block_zoom(1, 1.4)
            .select_block(4);
        assert_eq!(s.blocks.block1.transform, Transform::default());
        assert_eq!(s.active_block, 1);
        assert_eq!(s2.blocks.block1.transform.pan_x, 10.0);
        assert_eq!(s2.blocks.block1.transform.zoom, 1.4);
        assert_eq!(s2.active_block, 4);
        // Block 3 carries no photo: photo updates to it are a no-op.
        assert_eq!(s.with_block_pan(3, 9.0, 9.0), s);
    }

    #[test]
    fn serializes_blocks_under_numeric_keys() {
        let json = serde_json::to_value(StoryState::new(3)).unwrap();
        assert!(json["blocks"]["1"].is_object());
        assert!(json["blocks"]["4"].is_object());
        assert!(json["blocks"].get("3").is_none());
        assert_eq!(json["separators"]["s2"], 960.0);
    }

    #[test]
    fn migrates_legacy_splits_shape() {
        let legacy = serde_json::json!({
            "activeBlockId": 2,
            "splits": { "s1": 450.0, "s2": 1000.0, "s3": 1500.0 },
            "blocks": {
                "1": { "imgIndex": 2, "transform": { "zoom": 1.2, "panX": 8.0 } },
                "2": { "imgIndex": 0 },
                "4": { "imgIndex": 1 }
            }
        });
        let s = StoryState::migrate(&legacy);
        assert_eq!(s.version, 2);
        assert_eq!(s.active_block, 2);
        assert_eq!(s.blocks.block1.image_index, 2);
        assert_eq!(s.blocks.block1.transform.zoom, 1.2);
        assert_eq!(s.blocks.block2.image_index, 0);
        assert_eq!(s.separators.s1, 450.0);
        assert_eq!(s.separators.s2, 1000.0);
        // 1500 is outside the ±140 band around 1440 → clamped.
        assert_eq!(s.separators.s3, 1440.0 + SEPARATOR_BAND);
    }

    #[test]
    fn migrates_current_shape_unchanged() {
        let state = StoryState::new(3).with_block_image(4, 7).drag_separator(1, 30.0);
        let json = serde_json::to_value(state).unwrap();
        assert_eq!(StoryState::migrate(&json), state);
    }

    #[test]
    fn migrate_tolerates_garbage() {
        let s = StoryState::migrate(&serde_json::json!({ "splits": "nope" }));
        assert_eq!(s.separators, Separators::default());
    }
}
