//! # thumbGen — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │              外壳层（CLI / 桌面 UI，不在本库内）            │
//! │                                                          │
//! │   ThumbnailRequest ──────────────▶ ThumbnailResponse     │
//! └───────┼──────────────────────────────────────▲───────────┘
//!         ↓                                      │ Result<_, AppError>
//! ┌───────┼──────────────────────────────────────┼───────────┐
//! │       ↓            核心 (Rust)                │           │
//! │                                                          │
//! │  ┌─ error ────── AppError (统一错误类型)                  │
//! │  │                                                       │
//! │  └─ thumbnail ── 1920x1080 缩略图流水线                   │
//! │      ├─ loader     源图 / Logo 加载与校验                 │
//! │      ├─ resizer    cover 缩放 + 偏移裁剪                  │
//! │      ├─ banner     四种横幅形状 + 回退矩形                │
//! │      ├─ logo       资源解析 · 缩放 · 只读缓存             │
//! │      └─ handler    编排 + 原子落盘                        │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError`，二进制入口的返回类型 |
//! | [`thumbnail`] | 缩放裁剪、横幅渲染、Logo 合成与 PNG 输出 |

pub mod error;
pub mod thumbnail;
