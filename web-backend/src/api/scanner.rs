use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Responder};
use futures_util::TryStreamExt;
use uuid::Uuid;

use crate::state::AppState;

// 上传大小上限
const UPLOAD_LIMIT: usize = 50 * 1024 * 1024; // 50MB

pub fn configure_scanner_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/scan", web::post().to(upload_and_scan));
}

pub async fn upload_and_scan(state: web::Data<AppState>, mut payload: Multipart) -> impl Responder {
    // 读取第一个文件字段，忽略其余字段
    let mut uploaded: Option<Vec<u8>> = None;

    loop {
        match payload.try_next().await {
            Ok(Some(mut field)) => {
                let data = match field.bytes(UPLOAD_LIMIT).await {
                    Ok(Ok(bytes)) => Vec::from(bytes.as_ref()),
                    Ok(Err(e)) => {
                        return HttpResponse::InternalServerError().json(serde_json::json!({
                            "error": format!("Failed to read field: {}", e)
                        }));
                    }
                    Err(_) => {
                        return HttpResponse::PayloadTooLarge().json(serde_json::json!({
                            "error": "File size limit exceeded"
                        }));
                    }
                };

                uploaded = Some(data);
                break;
            }
            Ok(None) => {
                // 没有更多字段了
                break;
            }
            Err(_) => {
                break;
            }
        }
    }

    let Some(raw) = uploaded else {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "No file field in upload"
        }));
    };

    // 解码失败属于客户端错误，不进入扫描流水线
    let content = match String::from_utf8(raw) {
        Ok(text) => text,
        Err(_) => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Uploaded file is not valid UTF-8"
            }));
        }
    };

    let scan_id = Uuid::new_v4();
    let start = std::time::Instant::now();

    let report = loglens_core::scan_content(&state.catalog, &state.resolver, &content).await;

    tracing::info!(
        "scan {}: {} lines, {} threats in {:?}",
        scan_id,
        report.total_lines,
        report.threats_found,
        start.elapsed()
    );

    HttpResponse::Ok().json(report)
}
