use serde::{Serialize, Serializer};

/// 业务错误码
///
/// 0 表示成功；1xxx 通用；2xxx 认证与用户；3xxx 文件；4xxx 教学资源；5xxx 改进计划与阶段评估。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    UnprocessableEntity = 1022,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    AuthFailed = 2000,
    UserNotFound = 2001,
    UserEmailAlreadyExists = 2002,
    UserEmailInvalid = 2003,
    UserPasswordInvalid = 2004,
    UserInactive = 2005,
    CanNotDeleteCurrentUser = 2006,
    ProfileMissing = 2007,
    StudentNotFound = 2010,
    TeacherNotFound = 2011,

    FileNotFound = 3000,
    FileUploadFailed = 3001,
    FileTypeNotAllowed = 3002,
    FileSizeExceeded = 3003,
    MultifileUploadNotAllowed = 3004,

    QuestionnaireNotFound = 4000,
    QuestionnaireHasResponses = 4001,
    QuestionnaireAlreadyAnswered = 4002,
    AnswerCountMismatch = 4003,
    IndicatorNotFound = 4010,
    IndicatorNotApplicable = 4011,
    GradeNotFound = 4020,
    ScoreOutOfRange = 4021,
    PhaseOutOfRange = 4022,
    ExportFailed = 4030,

    PlanNotFound = 5000,
    PlanAlreadyExists = 5001,
    ActivityNotFound = 5010,
    ActivityStateInvalid = 5011,
    EvaluationFailed = 5020,
    DocumentRenderFailed = 5021,
    MailSendFailed = 5022,
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(*self as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_grouped() {
        assert_eq!(ErrorCode::Success as i32, 0);
        assert_eq!(ErrorCode::AuthFailed as i32 / 1000, 2);
        assert_eq!(ErrorCode::FileNotFound as i32 / 1000, 3);
        assert_eq!(ErrorCode::PhaseOutOfRange as i32 / 1000, 4);
        assert_eq!(ErrorCode::PlanAlreadyExists as i32 / 1000, 5);
    }

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_string(&ErrorCode::PlanNotFound).unwrap();
        assert_eq!(json, "5000");
    }
}
