use axum::http::StatusCode;
use axum::{Json, Router, routing::post};
use log::{error, info};

use crate::config::ServerConfig;
use crate::data::{SchedulingInput, SchedulingOutput};
use crate::report::{self, TimetableRow};
use crate::solver;

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

async fn solve_handler(Json(input): Json<SchedulingInput>) -> ApiResult<SchedulingOutput> {
    match solver::solve(&input) {
        Ok(output) => Ok(Json(output)),
        Err(e) => {
            error!("Rejected scheduling request: {e}");
            Err((StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))
        }
    }
}

async fn timetable_handler(Json(input): Json<SchedulingInput>) -> ApiResult<Vec<TimetableRow>> {
    match solver::solve(&input) {
        Ok(output) => Ok(Json(report::timetable_rows(
            &output,
            &input.sections,
            &input.students,
            &input.rooms,
        ))),
        Err(e) => {
            error!("Rejected timetable request: {e}");
            Err((StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))
        }
    }
}

pub fn router() -> Router {
    Router::new()
        .route("/v1/schedule/solve", post(solve_handler))
        .route("/v1/schedule/timetable", post(timetable_handler))
}

pub async fn run_server(config: &ServerConfig) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, router()).await
}
