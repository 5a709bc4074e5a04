//! 仪表盘静态资源路由
//!
//! 使用 rust-embed 嵌入仪表盘构建产物：
//! - SPA fallback（未找到的路由返回 index.html）
//! - `/dosen`、`/asisten`、`/mahasiswa` 需要登录，未登录时跳转 `/login`
//! - `%API_BASE%` 占位符替换为 BFF 的 API 前缀

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use rust_embed::Embed;
use std::path::Path;

use crate::middlewares;

/// 嵌入前端静态资源
/// 编译时从 frontend/dist/ 目录读取文件
#[derive(Embed)]
#[folder = "frontend/dist/"]
struct FrontendAssets;

/// 仪表盘通过该前缀访问 BFF 接口
const API_BASE: &str = "/api/v1";

const INDEX: &str = "index.html";

/// 命中的静态资源
struct Asset {
    path: String,
    data: Vec<u8>,
}

impl Asset {
    fn load(path: &str) -> Option<Self> {
        FrontendAssets::get(path).map(|f| Self {
            path: path.to_string(),
            data: f.data.to_vec(),
        })
    }

    /// 找不到的路径交给 SPA 路由处理
    fn resolve(path: &str) -> Option<Self> {
        if path.is_empty() {
            return Self::load(INDEX);
        }
        Self::load(path).or_else(|| Self::load(INDEX))
    }

    fn extension(&self) -> &str {
        Path::new(&self.path)
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
    }

    fn mime(&self) -> &'static str {
        get_mime_type(self.extension())
    }

    /// 构建产物带 hash，可长期缓存；入口页面每次重新获取
    fn cache_control(&self) -> &'static str {
        match self.extension() {
            "js" | "css" | "woff" | "woff2" | "png" | "jpg" | "jpeg" | "svg" | "webp" => {
                "public, max-age=31536000, immutable"
            }
            _ => "no-cache, no-store, must-revalidate",
        }
    }

    fn into_body(self) -> Vec<u8> {
        if self.extension() == "html" {
            process_html(&self.data)
        } else {
            self.data
        }
    }
}

fn get_mime_type(extension: &str) -> &'static str {
    match extension {
        "html" => "text/html; charset=utf-8",
        "js" | "mjs" => "application/javascript; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "json" | "map" => "application/json; charset=utf-8",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        _ => "application/octet-stream",
    }
}

fn process_html(content: &[u8]) -> Vec<u8> {
    String::from_utf8_lossy(content)
        .replace("%API_BASE%", API_BASE)
        .into_bytes()
}

/// 仪表盘资源请求处理
pub async fn serve_frontend(req: HttpRequest) -> ActixResult<HttpResponse> {
    let path = req.match_info().query("tail").trim_start_matches('/');

    let Some(asset) = Asset::resolve(path) else {
        return Ok(HttpResponse::NotFound()
            .content_type("text/plain; charset=utf-8")
            .body("MonPAD dashboard assets are not embedded in this build"));
    };

    Ok(HttpResponse::Ok()
        .content_type(asset.mime())
        .insert_header(("Cache-Control", asset.cache_control()))
        .body(asset.into_body()))
}

/// 按角色划分的仪表盘页面
pub const DASHBOARD_PAGES: [&str; 3] = ["/dosen", "/asisten", "/mahasiswa"];

/// 配置前端路由，必须在所有 API 路由之后注册
pub fn configure_frontend_routes(cfg: &mut web::ServiceConfig) {
    for page in DASHBOARD_PAGES {
        cfg.service(
            web::scope(page)
                .wrap(middlewares::RequireSession)
                .route("", web::get().to(serve_frontend))
                .route("/{tail:.*}", web::get().to(serve_frontend)),
        );
    }
    // 其余非 API 路由 (含 /login) 都交给前端处理
    cfg.route("/{tail:.*}", web::get().to(serve_frontend));
}
