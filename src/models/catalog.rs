// SPDX-License-Identifier: MPL-2.0
//! Built-in model table.
//!
//! The engine enumerates its networks as integer `MODEL_*` constants, and a
//! live engine is always asked for them through
//! [`SrBackend::model_constants`](crate::application::port::SrBackend::model_constants).
//! This table is only used when no engine answers (builds without the
//! `sr-vulkan` feature, test doubles, or a failed scan). Its names follow the
//! engine's networks; its values are sequential and are not the engine's ids.

/// `(constant name, value)` pairs used when the engine cannot be scanned.
pub const MODEL_CONSTANTS: &[(&str, i32)] = &[
    // waifu2x cunet
    ("MODEL_WAIFU2X_CUNET_UP1X_DENOISE0X", 0),
    ("MODEL_WAIFU2X_CUNET_UP1X_DENOISE1X", 1),
    ("MODEL_WAIFU2X_CUNET_UP1X_DENOISE2X", 2),
    ("MODEL_WAIFU2X_CUNET_UP1X_DENOISE3X", 3),
    ("MODEL_WAIFU2X_CUNET_UP2X", 4),
    ("MODEL_WAIFU2X_CUNET_UP2X_DENOISE0X", 5),
    ("MODEL_WAIFU2X_CUNET_UP2X_DENOISE1X", 6),
    ("MODEL_WAIFU2X_CUNET_UP2X_DENOISE2X", 7),
    ("MODEL_WAIFU2X_CUNET_UP2X_DENOISE3X", 8),
    // waifu2x anime style art
    ("MODEL_WAIFU2X_ANIME_UP2X", 9),
    ("MODEL_WAIFU2X_ANIME_UP2X_DENOISE0X", 10),
    ("MODEL_WAIFU2X_ANIME_UP2X_DENOISE1X", 11),
    ("MODEL_WAIFU2X_ANIME_UP2X_DENOISE2X", 12),
    ("MODEL_WAIFU2X_ANIME_UP2X_DENOISE3X", 13),
    // waifu2x photo
    ("MODEL_WAIFU2X_PHOTO_UP2X", 14),
    ("MODEL_WAIFU2X_PHOTO_UP2X_DENOISE0X", 15),
    ("MODEL_WAIFU2X_PHOTO_UP2X_DENOISE1X", 16),
    ("MODEL_WAIFU2X_PHOTO_UP2X_DENOISE2X", 17),
    ("MODEL_WAIFU2X_PHOTO_UP2X_DENOISE3X", 18),
    // Real-CUGAN pro
    ("MODEL_REALCUGAN_PRO_CONSERVATIVE_UP2X", 19),
    ("MODEL_REALCUGAN_PRO_CONSERVATIVE_UP3X", 20),
    ("MODEL_REALCUGAN_PRO_DENOISE3X_UP2X", 21),
    ("MODEL_REALCUGAN_PRO_DENOISE3X_UP3X", 22),
    ("MODEL_REALCUGAN_PRO_NO_DENOISE_UP2X", 23),
    ("MODEL_REALCUGAN_PRO_NO_DENOISE_UP3X", 24),
    // Real-CUGAN se
    ("MODEL_REALCUGAN_SE_CONSERVATIVE_UP2X", 25),
    ("MODEL_REALCUGAN_SE_CONSERVATIVE_UP3X", 26),
    ("MODEL_REALCUGAN_SE_CONSERVATIVE_UP4X", 27),
    ("MODEL_REALCUGAN_SE_DENOISE1X_UP2X", 28),
    ("MODEL_REALCUGAN_SE_DENOISE2X_UP2X", 29),
    ("MODEL_REALCUGAN_SE_DENOISE3X_UP2X", 30),
    ("MODEL_REALCUGAN_SE_DENOISE3X_UP3X", 31),
    ("MODEL_REALCUGAN_SE_DENOISE3X_UP4X", 32),
    ("MODEL_REALCUGAN_SE_NO_DENOISE_UP2X", 33),
    ("MODEL_REALCUGAN_SE_NO_DENOISE_UP3X", 34),
    ("MODEL_REALCUGAN_SE_NO_DENOISE_UP4X", 35),
    // RealSR
    ("MODEL_REALSR_DF2K_UP4X", 36),
    // Real-ESRGAN
    ("MODEL_REALESRGAN_ANIMAVIDEOV3_UP2X", 37),
    ("MODEL_REALESRGAN_ANIMAVIDEOV3_UP3X", 38),
    ("MODEL_REALESRGAN_ANIMAVIDEOV3_UP4X", 39),
    ("MODEL_REALESRGAN_X4PLUS_UP4X", 40),
    ("MODEL_REALESRGAN_X4PLUSANIME_UP4X", 41),
];
