//! 托管存储推送的原始快照
//!
//! 托管后端在每次变化时推送整表快照。条目以投递顺序保存为向量而非映射，
//! 因为投影必须保持快照的迭代顺序（不做额外排序）。

use serde_json::Value;

/// 一次快照投递：`(记录键, 原始 JSON 值)` 的有序列表。
///
/// 每次投递都是权威的全量状态，消费者整体替换而不是合并自己的投影。
pub type RawSnapshot = Vec<(String, Value)>;
