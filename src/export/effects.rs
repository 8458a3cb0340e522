//! Post-processing effects applied to images before they are written.
//!
//! Each effect sees the entity and the current image and may return a
//! replacement. Returning `None` keeps the current image.

use std::fmt;

use image::{imageops, Rgba, RgbaImage};

use crate::error::{PakError, Result};
use crate::types::{Colour, Entity};

/// Largest accepted `scale:N` factor.
pub const MAX_SCALE: u32 = 64;

/// A single post-processing step.
pub type Effect = Box<dyn Fn(&Entity, &RgbaImage) -> Option<RgbaImage>>;

/// Ordered list of effects.
#[derive(Default)]
pub struct EffectChain {
    effects: Vec<Effect>,
}

impl EffectChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, effect: Effect) -> &mut Self {
        self.effects.push(effect);
        self
    }

    /// Build a chain from effect specs such as `canvas` or `scale:2`.
    pub fn parse<S: AsRef<str>>(specs: &[S]) -> Result<Self> {
        let mut chain = Self::new();
        for spec in specs {
            chain.push(parse_effect(spec.as_ref())?);
        }
        Ok(chain)
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Run every effect in order.
    pub fn apply(&self, entity: &Entity, image: RgbaImage) -> RgbaImage {
        let mut current = image;
        for effect in &self.effects {
            if let Some(next) = effect(entity, &current) {
                current = next;
            }
        }
        current
    }
}

impl fmt::Debug for EffectChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectChain").field("len", &self.effects.len()).finish()
    }
}

/// Parse an effect spec: `canvas`, `dodge`, `scale:N` or `background:#RRGGBB`.
pub fn parse_effect(spec: &str) -> Result<Effect> {
    let (name, arg) = match spec.split_once(':') {
        Some((name, arg)) => (name.trim(), Some(arg.trim())),
        None => (spec.trim(), None),
    };

    match (name, arg) {
        ("canvas", None) => Ok(canvas()),
        ("dodge", None) => Ok(dodge()),
        ("scale", Some(n)) => {
            let factor = n
                .parse::<u32>()
                .ok()
                .filter(|f| (1..=MAX_SCALE).contains(f))
                .ok_or_else(|| PakError::Parse {
                    message: format!("Invalid scale factor '{}'", n),
                    help: Some(format!("Scale must be an integer from 1 to {}, e.g. scale:2", MAX_SCALE)),
                })?;
            Ok(scale(factor))
        }
        ("background", Some(colour)) => Ok(background(Colour::from_hex(colour)?)),
        _ => Err(PakError::Parse {
            message: format!("Unknown effect '{}'", spec),
            help: Some("Available effects: canvas, dodge, scale:N, background:#RRGGBB".to_string()),
        }),
    }
}

/// Place the image on a transparent canvas of the entity's frame size.
pub fn canvas() -> Effect {
    Box::new(|entity: &Entity, image: &RgbaImage| {
        let (w, h) = entity.frame_size;
        if w == 0 || h == 0 {
            return None;
        }
        let mut out = RgbaImage::new(w, h);
        imageops::overlay(
            &mut out,
            image,
            entity.location.x as i64,
            entity.location.y as i64,
        );
        Some(out)
    })
}

/// Nearest-neighbour integer upscale. Sizes that overflow keep the image.
pub fn scale(factor: u32) -> Effect {
    Box::new(move |_: &Entity, image: &RgbaImage| {
        if factor <= 1 {
            return None;
        }
        let width = image.width().checked_mul(factor)?;
        let height = image.height().checked_mul(factor)?;
        let mut out = RgbaImage::new(width, height);
        for (x, y, px) in image.enumerate_pixels() {
            for sy in 0..factor {
                for sx in 0..factor {
                    out.put_pixel(x * factor + sx, y * factor + sy, *px);
                }
            }
        }
        Some(out)
    })
}

/// Linear-dodge alpha: each pixel's alpha becomes its brightest channel.
pub fn dodge() -> Effect {
    Box::new(|_: &Entity, image: &RgbaImage| {
        let mut out = image.clone();
        for px in out.pixels_mut() {
            let colour = Colour::from(*px);
            if colour.is_transparent() {
                continue;
            }
            px.0[3] = colour.r.max(colour.g).max(colour.b);
        }
        Some(out)
    })
}

/// Composite the image over a solid colour.
pub fn background(colour: Colour) -> Effect {
    Box::new(move |_: &Entity, image: &RgbaImage| {
        let mut out = RgbaImage::from_pixel(image.width(), image.height(), Rgba(colour.to_rgba()));
        imageops::overlay(&mut out, image, 0, 0);
        Some(out)
    })
}
