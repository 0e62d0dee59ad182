use crate::api::vacation::ErrorBody;
use crate::model::vacation::{Status, Vacation};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vacation Requests API",
        version = "1.0.0",
        description = r#"
## Vacation requests

Employees request time off, a reviewer approves or declines.

### Lifecycle
- A request is always created with status **CREATED**
- `PUT /vacations/{id}` approves, `DELETE /vacations/{id}` declines
- Approving twice or declining twice is rejected, flipping between
  **APPROVED** and **DECLINED** is allowed

### Search
`GET /vacations?username=a&username=b` matches each fragment case-insensitively
against the requester and concatenates the results in fragment order.

### Errors
Business rule violations answer `400` with `{"error": "..."}`.
No authentication is applied.
"#,
    ),
    paths(
        crate::api::vacation::create_vacation,
        crate::api::vacation::search_vacations,
        crate::api::vacation::get_vacation,
        crate::api::vacation::approve_vacation,
        crate::api::vacation::decline_vacation
    ),
    components(
        schemas(
            Vacation,
            Status,
            ErrorBody
        )
    ),
    tags(
        (name = "Vacation", description = "Vacation request APIs"),
    )
)]
pub struct ApiDoc;
