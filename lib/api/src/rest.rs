use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use serde::{Deserialize, Serialize};
use skillmatch_core::{Error, SearchMethod, SuggestOptions, Suggestion};
use skillmatch_storage::SkillService;
use std::sync::Arc;

#[derive(Deserialize)]
struct SuggestRequest {
    role: String,
    limit: Option<usize>,
    use_mapping: Option<bool>,
}

#[derive(Serialize)]
struct SuggestResponse {
    normalized_role: String,
    search_method: SearchMethod,
    skills: Vec<Suggestion>,
}

#[derive(Deserialize, Default)]
struct RefreshRequest {
    #[serde(default)]
    reembed: bool,
}

#[derive(Serialize)]
struct RefreshResponse {
    status: String,
    skills_indexed: usize,
    duration_seconds: f64,
    message: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    skills_indexed: usize,
    vectors_loaded: bool,
    model_loaded: bool,
}

#[derive(Serialize)]
struct MappingEntry {
    role: String,
    normalized_role: String,
    skills: Vec<String>,
}

#[derive(Serialize)]
struct MappingsResponse {
    mappings: Vec<MappingEntry>,
    count: usize,
}

#[derive(Deserialize)]
struct AddMappingRequest {
    role: String,
    skills: Vec<String>,
}

#[derive(Deserialize)]
struct UpdateMappingRequest {
    original_role: String,
    role: String,
    skills: Vec<String>,
}

#[derive(Serialize)]
struct MappingActionResponse {
    success: bool,
    message: String,
}

fn error_response(err: &Error) -> HttpResponse {
    let body = serde_json::json!({ "error": err.to_string() });
    match err {
        Error::Validation(_) | Error::MappingExists(_) => HttpResponse::BadRequest().json(body),
        Error::MappingNotFound(_) => HttpResponse::NotFound().json(body),
        Error::NotReady | Error::Upstream(_) => HttpResponse::ServiceUnavailable().json(body),
        Error::RefreshBusy(_) => HttpResponse::Conflict().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}

pub struct RestApi;

impl RestApi {
    pub async fn start(service: Arc<SkillService>, port: u16) -> std::io::Result<()> {
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(service.clone()))
                .route("/suggest-skills", web::post().to(suggest_skills))
                .route("/skills/refresh-vectors", web::post().to(refresh_vectors))
                .route("/skills/health", web::get().to(health_check))
                .route("/knowledge-base/mappings", web::get().to(list_mappings))
                .route("/knowledge-base/mappings", web::post().to(add_mapping))
                .route("/knowledge-base/mappings", web::put().to(update_mapping))
                .route(
                    "/knowledge-base/mappings/{role}",
                    web::delete().to(delete_mapping),
                )
                .route("/knowledge-base/reload", web::post().to(reload_mappings))
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }
}

async fn suggest_skills(
    service: web::Data<Arc<SkillService>>,
    req: web::Json<SuggestRequest>,
) -> ActixResult<HttpResponse> {
    let mut opts = SuggestOptions::default();
    if let Some(limit) = req.limit {
        opts.limit = limit;
    }
    if let Some(use_mapping) = req.use_mapping {
        opts.use_mapping = use_mapping;
    }

    match service.suggest(&req.role, &opts) {
        Ok(outcome) => {
            tracing::info!(
                role = %req.role,
                normalized = %outcome.normalized_role,
                results = outcome.skills.len(),
                "suggested skills"
            );
            Ok(HttpResponse::Ok().json(SuggestResponse {
                normalized_role: outcome.normalized_role,
                search_method: outcome.search_method,
                skills: outcome.skills,
            }))
        }
        Err(err) => Ok(error_response(&err)),
    }
}

async fn refresh_vectors(
    service: web::Data<Arc<SkillService>>,
    req: Option<web::Json<RefreshRequest>>,
) -> ActixResult<HttpResponse> {
    let reembed = req.map(|r| r.reembed).unwrap_or(false);
    let service = service.get_ref().clone();

    // Embedding a full catalog is CPU-bound; keep it off the worker pool.
    match web::block(move || service.refresh(reembed)).await {
        Ok(Ok(outcome)) => Ok(HttpResponse::Ok().json(RefreshResponse {
            status: "success".to_string(),
            skills_indexed: outcome.skills_indexed,
            duration_seconds: outcome.duration.as_secs_f64(),
            message: format!(
                "Successfully refreshed {} skill vectors",
                outcome.skills_indexed
            ),
        })),
        Ok(Err(err)) => Ok(error_response(&err)),
        Err(err) => Ok(HttpResponse::InternalServerError()
            .json(serde_json::json!({ "error": err.to_string() }))),
    }
}

async fn health_check(service: web::Data<Arc<SkillService>>) -> ActixResult<HttpResponse> {
    let health = service.health();
    Ok(HttpResponse::Ok().json(HealthResponse {
        status: if health.vectors_loaded {
            "healthy".to_string()
        } else {
            "initializing".to_string()
        },
        skills_indexed: health.skills_indexed,
        vectors_loaded: health.vectors_loaded,
        model_loaded: health.model_loaded,
    }))
}

async fn list_mappings(service: web::Data<Arc<SkillService>>) -> ActixResult<HttpResponse> {
    let mappings: Vec<MappingEntry> = service
        .list_mappings()
        .into_iter()
        .map(|m| MappingEntry {
            role: m.role,
            normalized_role: m.normalized_role,
            skills: m.skills,
        })
        .collect();

    let count = mappings.len();
    Ok(HttpResponse::Ok().json(MappingsResponse { mappings, count }))
}

async fn add_mapping(
    service: web::Data<Arc<SkillService>>,
    req: web::Json<AddMappingRequest>,
) -> ActixResult<HttpResponse> {
    match service.add_mapping(&req.role, &req.skills) {
        Ok(()) => Ok(HttpResponse::Ok().json(MappingActionResponse {
            success: true,
            message: format!("Added mapping for '{}'", req.role.trim()),
        })),
        Err(err) => Ok(error_response(&err)),
    }
}

async fn update_mapping(
    service: web::Data<Arc<SkillService>>,
    req: web::Json<UpdateMappingRequest>,
) -> ActixResult<HttpResponse> {
    match service.update_mapping(&req.original_role, &req.role, &req.skills) {
        Ok(()) => Ok(HttpResponse::Ok().json(MappingActionResponse {
            success: true,
            message: format!("Updated mapping for '{}'", req.role.trim()),
        })),
        Err(err) => Ok(error_response(&err)),
    }
}

async fn delete_mapping(
    service: web::Data<Arc<SkillService>>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let role = path.into_inner();
    match service.delete_mapping(&role) {
        Ok(()) => Ok(HttpResponse::Ok().json(MappingActionResponse {
            success: true,
            message: format!("Deleted mapping for '{role}'"),
        })),
        Err(err) => Ok(error_response(&err)),
    }
}

async fn reload_mappings(service: web::Data<Arc<SkillService>>) -> ActixResult<HttpResponse> {
    match service.reload_mappings() {
        Ok(count) => Ok(HttpResponse::Ok().json(MappingActionResponse {
            success: true,
            message: format!("Reloaded {count} role mappings"),
        })),
        Err(err) => Ok(error_response(&err)),
    }
}
