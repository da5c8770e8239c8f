use std::num::NonZeroU32;

/// Rectangle in surface space: pixel coordinates of the drawing overlay as
/// currently rendered, which may be scaled relative to the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Rectangle in original space: pixel coordinates of the full-resolution
/// source image, independent of on-screen scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OriginalRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

fn corners_to_parts(a: (i32, i32), b: (i32, i32)) -> (i32, i32, u32, u32) {
    (
        a.0.min(b.0),
        a.1.min(b.1),
        a.0.abs_diff(b.0),
        a.1.abs_diff(b.1),
    )
}

impl SurfaceRect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Normalizes an anchor/release point pair to top-left + non-negative size.
    pub fn from_corners(a: (i32, i32), b: (i32, i32)) -> Self {
        let (x, y, width, height) = corners_to_parts(a, b);
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

impl OriginalRect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_corners(a: (i32, i32), b: (i32, i32)) -> Self {
        let (x, y, width, height) = corners_to_parts(a, b);
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

impl From<SurfaceRect> for emath::Rect {
    fn from(r: SurfaceRect) -> Self {
        emath::Rect::from_min_size(
            emath::pos2(r.x as f32, r.y as f32),
            emath::vec2(r.width as f32, r.height as f32),
        )
    }
}

/// Per-axis conversion factors between surface and original space
/// (`original ÷ surface`). A zero dimension on either side collapses to
/// [`Scale::IDENTITY`], making the two spaces coincide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    x: f32,
    y: f32,
}

impl Scale {
    pub const IDENTITY: Self = Self { x: 1.0, y: 1.0 };

    pub fn new(surface: (u32, u32), original: (u32, u32)) -> Self {
        if surface.0 == 0 || surface.1 == 0 || original.0 == 0 || original.1 == 0 {
            return Self::IDENTITY;
        }
        Self {
            x: original.0 as f32 / surface.0 as f32,
            y: original.1 as f32 / surface.1 as f32,
        }
    }

    pub fn is_identity(self) -> bool {
        self == Self::IDENTITY
    }

    /// Surface → original, each coordinate rounded to the nearest integer.
    pub fn to_original(self, r: SurfaceRect) -> OriginalRect {
        OriginalRect {
            x: round_coord(r.x, self.x),
            y: round_coord(r.y, self.y),
            width: round_size(r.width, self.x),
            height: round_size(r.height, self.y),
        }
    }

    /// Original → surface, the guarded inverse of [`Scale::to_original`].
    pub fn to_surface(self, r: OriginalRect) -> SurfaceRect {
        SurfaceRect {
            x: round_coord(r.x, 1.0 / self.x),
            y: round_coord(r.y, 1.0 / self.y),
            width: round_size(r.width, 1.0 / self.x),
            height: round_size(r.height, 1.0 / self.y),
        }
    }
}

fn round_coord(v: i32, factor: f32) -> i32 {
    (v as f32 * factor).round() as i32
}

fn round_size(v: u32, factor: f32) -> u32 {
    (v as f32 * factor).round().max(0.0) as u32
}

/// Region list entry accepted by
/// [`RegionSelector::set_regions`](crate::RegionSelector::set_regions):
/// either `(x, y, w, h)` or opposite corners `(x0, y0, x1, y1)`, expressed in
/// original-space pixels. Which convention applies is decided against the
/// original image size in [`RegionTuple::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionTuple(pub [i32; 4]);

impl RegionTuple {
    /// Reads the tuple as origin + size, unless the third or fourth value
    /// exceeds the known original width/height respectively, in which case it
    /// is taken as opposite corners and the size derived by subtraction.
    /// Without a known original size there is no bound to compare against and
    /// the tuple is always origin + size.
    pub fn resolve(self, original_size: Option<(NonZeroU32, NonZeroU32)>) -> OriginalRect {
        let [x, y, a, b] = self.0;
        if let Some((w, h)) = original_size {
            if a > w.get() as i32 || b > h.get() as i32 {
                return OriginalRect::from_corners((x, y), (a, b));
            }
        }
        OriginalRect {
            x,
            y,
            width: a.max(0) as u32,
            height: b.max(0) as u32,
        }
    }
}

impl From<[i32; 4]> for RegionTuple {
    fn from(value: [i32; 4]) -> Self {
        Self(value)
    }
}

impl From<OriginalRect> for RegionTuple {
    fn from(r: OriginalRect) -> Self {
        Self([r.x, r.y, r.width as i32, r.height as i32])
    }
}

impl ::serde::Serialize for OriginalRect {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ::serde::Serializer,
    {
        use ::serde::ser::SerializeTuple;
        let mut tuple = serializer.serialize_tuple(4)?;
        tuple.serialize_element(&self.x)?;
        tuple.serialize_element(&self.y)?;
        tuple.serialize_element(&self.width)?;
        tuple.serialize_element(&self.height)?;
        tuple.end()
    }
}

impl<'de> ::serde::Deserialize<'de> for RegionTuple {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: ::serde::Deserializer<'de>,
    {
        struct RegionTupleVisitor;

        impl<'de> ::serde::de::Visitor<'de> for RegionTupleVisitor {
            type Value = RegionTuple;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("an array of 4 numbers")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: ::serde::de::SeqAccess<'de>,
            {
                let mut values = [0i32; 4];
                for (i, slot) in values.iter_mut().enumerate() {
                    *slot = seq
                        .next_element::<i32>()?
                        .ok_or_else(|| ::serde::de::Error::invalid_length(i, &self))?;
                }
                Ok(RegionTuple(values))
            }
        }

        deserializer.deserialize_seq(RegionTupleVisitor)
    }
}
