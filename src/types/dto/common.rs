use poem_openapi::Object;

/// Metadados de paginação retornados junto com qualquer listagem
#[derive(Object, Debug, Clone)]
pub struct PaginationMeta {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub pages: u64,
}

impl PaginationMeta {
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        Self {
            page,
            limit,
            total,
            pages: total.div_ceil(limit.max(1)),
        }
    }
}

/// Resposta genérica de sucesso com mensagem
#[derive(Object, Debug)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Object, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

/// Parâmetros de paginação validados: page >= 1, limit entre 1 e 100
#[derive(Debug, Clone, Copy)]
pub struct PageParams {
    pub page: u64,
    pub limit: u64,
}

impl PageParams {
    pub const MAX_LIMIT: u64 = 100;

    pub fn clamp(page: Option<u64>, limit: Option<u64>, default_limit: u64) -> Self {
        let page = page.unwrap_or(1).max(1);
        let limit = limit.unwrap_or(default_limit).clamp(1, Self::MAX_LIMIT);
        Self { page, limit }
    }

    pub fn skip(&self) -> u64 {
        (self.page - 1) * self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_applies_defaults() {
        let p = PageParams::clamp(None, None, 20);
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, 20);
        assert_eq!(p.skip(), 0);
    }

    #[test]
    fn test_clamp_enforces_minimums() {
        let p = PageParams::clamp(Some(0), Some(0), 20);
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, 1);
    }

    #[test]
    fn test_clamp_enforces_max_limit() {
        let p = PageParams::clamp(Some(3), Some(500), 20);
        assert_eq!(p.page, 3);
        assert_eq!(p.limit, 100);
        assert_eq!(p.skip(), 200);
    }

    #[test]
    fn test_pages_rounds_up() {
        let meta = PaginationMeta::new(1, 20, 41);
        assert_eq!(meta.pages, 3);
    }
}
