use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/file.ts")]
pub struct File {
    // 下载令牌
    pub token: String,
    // 上传时的文件名
    pub original_name: String,
    // 磁盘上的文件名
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub stored_name: String,
    // 文件大小（以字节为单位）
    pub file_size: i64,
    // 内容类型
    pub file_type: String,
    // 上传者
    pub user_id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 文件写入参数（用于存储层）
#[derive(Debug, Clone)]
pub struct NewFile {
    pub token: String,
    pub original_name: String,
    pub stored_name: String,
    pub file_size: i64,
    pub file_type: String,
    pub user_id: i64,
}
