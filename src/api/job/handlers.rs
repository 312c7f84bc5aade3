use actix_web::{
    HttpResponse, delete, get, post, put,
    web::{Data, Path, Query, ServiceConfig, scope},
};
use actix_web_validator::Json;

use super::dto::ListJobsQuery;
use super::models::{BatchStatusUpdate, CreateJob, UpdateJob};
use super::service::{JobService, ServiceError, parse_job_id};

#[post("")]
async fn create_job(
    service: Data<JobService>,
    job: Json<CreateJob>,
) -> Result<HttpResponse, ServiceError> {
    let job_row = service.create_job(&job).await?;
    Ok(HttpResponse::Created().json(job_row))
}

#[get("")]
async fn list_jobs(
    service: Data<JobService>,
    query: Query<ListJobsQuery>,
) -> Result<HttpResponse, ServiceError> {
    let jobs = service.list_jobs(query.archived()).await?;
    Ok(HttpResponse::Ok().json(jobs))
}

#[put("/status")]
async fn update_jobs_status(
    service: Data<JobService>,
    batch: Json<BatchStatusUpdate>,
) -> Result<HttpResponse, ServiceError> {
    let response = service.update_jobs_status(&batch).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[put("/archive/{id}")]
async fn archive_job(
    service: Data<JobService>,
    path: Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let id = parse_job_id(&path)?;
    let job_row = service.archive_job(id).await?;
    Ok(HttpResponse::Ok().json(job_row))
}

#[put("/{id}")]
async fn update_job(
    service: Data<JobService>,
    path: Path<String>,
    update: Json<UpdateJob>,
) -> Result<HttpResponse, ServiceError> {
    let id = parse_job_id(&path)?;
    let job_row = service.update_job(id, &update).await?;
    Ok(HttpResponse::Ok().json(job_row))
}

#[delete("/{id}")]
async fn delete_job(
    service: Data<JobService>,
    path: Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let id = parse_job_id(&path)?;
    let response = service.delete_job(id).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Mount the job routes under `/api/jobs`
///
/// The fixed `/status` and `/archive/{id}` paths are registered ahead of
/// `/{id}` so they are matched first.
pub fn job_config(config: &mut ServiceConfig) {
    config.service(
        scope("/api/jobs")
            .service(create_job)
            .service(list_jobs)
            .service(update_jobs_status)
            .service(archive_job)
            .service(update_job)
            .service(delete_job),
    );
}
