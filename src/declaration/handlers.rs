use actix_files::NamedFile;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{error::InternalError, mime, web, HttpRequest, HttpResponse, Responder};
use chrono::Local;
use log::{debug, error, info};
use thiserror::Error;

use crate::declaration::models::{PassportDeclaration, SubmissionResponse};
use crate::generators::{GeneratorError, Renderer, Validator};
use crate::storage::{FileStore, StoredDocument};
use crate::{AppState, ErrorResponse};

/// Failures after validation, while producing and storing the document.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Generation(#[from] GeneratorError),
    #[error("failed to store generated PDF: {0}")]
    Storage(#[source] std::io::Error),
}

/// Render the declaration and write it to the store in one step, so a failed
/// render never leaves a file behind.
pub fn generate_document(
    renderer: &dyn Renderer,
    store: &FileStore,
    declaration: &PassportDeclaration,
) -> Result<StoredDocument, SubmissionError> {
    let pdf = renderer.render(declaration)?;
    debug!(
        "Rendered {} bytes with the {} renderer",
        pdf.len(),
        renderer.name()
    );
    store
        .persist(&pdf, &declaration.employee_code, renderer.naming_scheme())
        .map_err(SubmissionError::Storage)
}

/// Turns JSON decoding failures into `ErrorResponse` bodies naming the bad field.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = format!("Invalid passport declaration: {}", err);
        error!("{}", message);
        let response = HttpResponse::BadRequest().json(ErrorResponse::bad_request(&message));
        InternalError::from_response(err, response).into()
    })
}

#[utoipa::path(
    tag = "Passport Declaration",
    post,
    path = "/api/passport",
    request_body = PassportDeclaration,
    responses(
        (status = 200, description = "PDF generated and stored", body = SubmissionResponse),
        (status = 400, description = "Missing or empty form field", body = ErrorResponse),
        (status = 500, description = "Signature, rendering or storage failure", body = ErrorResponse)
    )
)]
pub async fn submit_declaration(
    payload: web::Json<PassportDeclaration>,
    data: web::Data<AppState>,
) -> impl Responder {
    let declaration = payload.into_inner();
    info!(
        "Executing submit_declaration handler for employee code: {}",
        declaration.employee_code
    );

    if let Err(errors) = declaration.validate() {
        error!(
            "Passport declaration rejected for fields {:?}",
            errors.fields()
        );
        return HttpResponse::BadRequest().json(ErrorResponse::bad_request(&errors.to_string()));
    }

    let renderer = data.renderer.clone();
    let store = data.store.clone();
    let record = declaration.clone();
    let strategy = renderer.name();

    let result = web::block(move || generate_document(renderer.as_ref(), &store, &record)).await;

    match result {
        Ok(Ok(stored)) => {
            info!(
                "Passport declaration for {} stored as {}",
                declaration.employee_code, stored.filename
            );
            HttpResponse::Ok().json(SubmissionResponse {
                message: "Passport declaration submitted successfully".to_string(),
                data: declaration,
                pdf_path: stored.path.to_string_lossy().into_owned(),
                download_url: format!("/download/{}", stored.filename),
                view_url: format!("/view/{}", stored.filename),
                pdf_file: stored.filename,
                strategy: strategy.to_string(),
            })
        }
        Ok(Err(e)) => {
            error!(
                "Failed to generate passport declaration for {}: {}",
                declaration.employee_code, e
            );
            HttpResponse::InternalServerError().json(ErrorResponse::internal_error(&format!(
                "Error generating PDF: {}",
                e
            )))
        }
        Err(e) => {
            error!("PDF generation task was cancelled: {}", e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Error generating PDF"))
        }
    }
}

async fn serve_pdf(
    req: &HttpRequest,
    data: &AppState,
    filename: &str,
    disposition: DispositionType,
    display_name: String,
) -> HttpResponse {
    let Some(path) = data.store.locate(filename) else {
        error!("PDF not found: {}", filename);
        return HttpResponse::NotFound().json(ErrorResponse::not_found("File not found"));
    };

    match NamedFile::open_async(&path).await {
        Ok(file) => file
            .set_content_type(mime::APPLICATION_PDF)
            .set_content_disposition(ContentDisposition {
                disposition,
                parameters: vec![DispositionParam::Filename(display_name)],
            })
            .into_response(req),
        Err(e) => {
            error!("Failed to open {}: {}", path.display(), e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Failed to read PDF file"))
        }
    }
}

#[utoipa::path(
    tag = "Passport Declaration",
    get,
    path = "/download/{filename}",
    params(
        ("filename" = String, Path, description = "Name of a generated PDF")
    ),
    responses(
        (status = 200, description = "PDF as an attachment"),
        (status = 404, description = "File not found", body = ErrorResponse)
    )
)]
pub async fn download_pdf(
    req: HttpRequest,
    path: web::Path<String>,
    data: web::Data<AppState>,
) -> impl Responder {
    let filename = path.into_inner();
    info!("Executing download_pdf handler for filename: {}", filename);

    let display_name = format!(
        "passport_declaration_{}.pdf",
        Local::now().format("%Y%m%d")
    );
    serve_pdf(&req, &data, &filename, DispositionType::Attachment, display_name).await
}

#[utoipa::path(
    tag = "Passport Declaration",
    get,
    path = "/view/{filename}",
    params(
        ("filename" = String, Path, description = "Name of a generated PDF")
    ),
    responses(
        (status = 200, description = "PDF for inline display"),
        (status = 404, description = "File not found", body = ErrorResponse)
    )
)]
pub async fn view_pdf(
    req: HttpRequest,
    path: web::Path<String>,
    data: web::Data<AppState>,
) -> impl Responder {
    let filename = path.into_inner();
    info!("Executing view_pdf handler for filename: {}", filename);

    let display_name = filename.clone();
    serve_pdf(&req, &data, &filename, DispositionType::Inline, display_name).await
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/passport")
            .app_data(json_config())
            .route(web::post().to(submit_declaration)),
    )
    .service(web::resource("/download/{filename}").route(web::get().to(download_pdf)))
    .service(web::resource("/view/{filename}").route(web::get().to(view_pdf)));
}
