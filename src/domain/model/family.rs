// SPDX-License-Identifier: MPL-2.0
//! Model families shipped by the engine.

use std::fmt;

/// A network family, identified by the prefix of its constant names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelFamily {
    /// Real-CUGAN "pro" networks.
    RealCugan,
    /// Real-CUGAN "se" networks.
    RealCuganSe,
    /// Real-ESRGAN networks, including the anime video variants.
    RealEsrgan,
    /// RealSR (DF2K).
    RealSr,
    /// waifu2x (cunet, anime style art, photo).
    Waifu2x,
}

impl ModelFamily {
    /// All families in listing order.
    pub const ALL: [ModelFamily; 5] = [
        ModelFamily::RealCugan,
        ModelFamily::RealCuganSe,
        ModelFamily::RealEsrgan,
        ModelFamily::RealSr,
        ModelFamily::Waifu2x,
    ];

    /// Upper-case prefix used in constant names and listing headers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            ModelFamily::RealCugan => "REALCUGAN",
            ModelFamily::RealCuganSe => "REALCUGAN_SE",
            ModelFamily::RealEsrgan => "REALESRGAN",
            ModelFamily::RealSr => "REALSR",
            ModelFamily::Waifu2x => "WAIFU2X",
        }
    }

    /// Lower-case prefix matched against registry keys.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            ModelFamily::RealCugan => "realcugan",
            ModelFamily::RealCuganSe => "realcugan_se",
            ModelFamily::RealEsrgan => "realesrgan",
            ModelFamily::RealSr => "realsr",
            ModelFamily::Waifu2x => "waifu2x",
        }
    }

    /// Classifies a registry key by the longest family prefix it starts with.
    ///
    /// `realcugan_se_conservative_up2x` is [`ModelFamily::RealCuganSe`], not
    /// [`ModelFamily::RealCugan`].
    #[must_use]
    pub fn classify(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .filter(|family| key.starts_with(family.prefix()))
            .max_by_key(|family| family.prefix().len())
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
