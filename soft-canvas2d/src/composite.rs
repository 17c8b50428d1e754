//! Porter-Duff compositing.
//!
//! Every operator is a pair of factors `(fa, fb)` applied as
//! `result = src * fa + dst * fb` on premultiplied colors.

use crate::color::Premultiplied;
use crate::error::Canvas2dError;
use std::fmt;
use std::str::FromStr;

/// Global composite operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompositeOperation {
    #[default]
    SourceOver,
    SourceIn,
    SourceOut,
    SourceAtop,
    DestinationOver,
    DestinationIn,
    DestinationOut,
    DestinationAtop,
    Lighter,
    Copy,
    Xor,
}

/// A blend factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Factor {
    Zero,
    One,
    SrcAlpha,
    DstAlpha,
    OneMinusSrcAlpha,
    OneMinusDstAlpha,
}

impl Factor {
    #[inline]
    fn eval(self, src_alpha: f32, dst_alpha: f32) -> f32 {
        match self {
            Factor::Zero => 0.0,
            Factor::One => 1.0,
            Factor::SrcAlpha => src_alpha,
            Factor::DstAlpha => dst_alpha,
            Factor::OneMinusSrcAlpha => 1.0 - src_alpha,
            Factor::OneMinusDstAlpha => 1.0 - dst_alpha,
        }
    }
}

impl CompositeOperation {
    pub const ALL: [CompositeOperation; 11] = [
        CompositeOperation::SourceOver,
        CompositeOperation::SourceIn,
        CompositeOperation::SourceOut,
        CompositeOperation::SourceAtop,
        CompositeOperation::DestinationOver,
        CompositeOperation::DestinationIn,
        CompositeOperation::DestinationOut,
        CompositeOperation::DestinationAtop,
        CompositeOperation::Lighter,
        CompositeOperation::Copy,
        CompositeOperation::Xor,
    ];

    /// The `(fa, fb)` factor pair of this operator.
    pub fn factors(self) -> (Factor, Factor) {
        use Factor::*;
        match self {
            CompositeOperation::SourceOver => (One, OneMinusSrcAlpha),
            CompositeOperation::SourceIn => (DstAlpha, Zero),
            CompositeOperation::SourceOut => (OneMinusDstAlpha, Zero),
            CompositeOperation::SourceAtop => (DstAlpha, OneMinusSrcAlpha),
            CompositeOperation::DestinationOver => (OneMinusDstAlpha, One),
            CompositeOperation::DestinationIn => (Zero, SrcAlpha),
            CompositeOperation::DestinationOut => (Zero, OneMinusSrcAlpha),
            CompositeOperation::DestinationAtop => (OneMinusDstAlpha, SrcAlpha),
            CompositeOperation::Lighter => (One, One),
            CompositeOperation::Copy => (One, Zero),
            CompositeOperation::Xor => (OneMinusDstAlpha, OneMinusSrcAlpha),
        }
    }

    /// Whether a transparent source leaves the destination unchanged.
    ///
    /// Confined operators only touch pixels the source covers, so their
    /// results can be composited over the painted area alone. The others
    /// (e.g. `copy`, `source-in`) clear everything outside the source.
    pub fn is_confined(self) -> bool {
        let (_, fb) = self.factors();
        fb.eval(0.0, 0.0) == 1.0 && fb.eval(0.0, 1.0) == 1.0
    }

    /// Composite premultiplied `src` onto premultiplied `dst`.
    #[inline]
    pub fn blend(self, src: Premultiplied, dst: Premultiplied) -> Premultiplied {
        if self == CompositeOperation::SourceOver {
            let inv = 1.0 - src[3];
            return [
                src[0] + dst[0] * inv,
                src[1] + dst[1] * inv,
                src[2] + dst[2] * inv,
                src[3] + dst[3] * inv,
            ];
        }
        let (fa, fb) = self.factors();
        let fa = fa.eval(src[3], dst[3]);
        let fb = fb.eval(src[3], dst[3]);
        std::array::from_fn(|i| (src[i] * fa + dst[i] * fb).min(1.0))
    }

    /// CSS name of the operator.
    pub fn as_str(self) -> &'static str {
        match self {
            CompositeOperation::SourceOver => "source-over",
            CompositeOperation::SourceIn => "source-in",
            CompositeOperation::SourceOut => "source-out",
            CompositeOperation::SourceAtop => "source-atop",
            CompositeOperation::DestinationOver => "destination-over",
            CompositeOperation::DestinationIn => "destination-in",
            CompositeOperation::DestinationOut => "destination-out",
            CompositeOperation::DestinationAtop => "destination-atop",
            CompositeOperation::Lighter => "lighter",
            CompositeOperation::Copy => "copy",
            CompositeOperation::Xor => "xor",
        }
    }
}

impl fmt::Display for CompositeOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompositeOperation {
    type Err = Canvas2dError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CompositeOperation::ALL
            .iter()
            .copied()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| {
                Canvas2dError::InvalidArgument(format!("Invalid composite operation: '{}'", s))
            })
    }
}
