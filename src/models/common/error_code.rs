/// 业务错误码
///
/// 0 表示成功；1xxx 通用；2xxx 用户与认证；3xxx 预约与排班；
/// 4xxx 课程包；5xxx 服务端；6xxx 通知与模板；7xxx LINE。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    RateLimitExceeded = 1029,

    AuthFailed = 2000,
    RegistrationFailed = 2001,
    UserNotFound = 2004,
    UserAlreadyExists = 2009,
    UserUpdateFailed = 2010,
    UserDeleteFailed = 2011,
    UserCreationFailed = 2012,

    BookingPermissionDenied = 3003,
    BookingNotFound = 3004,
    SlotUnavailable = 3009,
    BookingInvalidStatus = 3010,
    BookingCreationFailed = 3011,
    BlockInvalid = 3100,
    BlockNotFound = 3104,

    PackageAdjustInvalid = 4000,
    PackagePermissionDenied = 4003,
    PackageNotFound = 4004,
    PackageUnavailable = 4009,
    PackageRequestInvalid = 4100,
    PackageRequestNotFound = 4104,
    PackageRequestInvalidStatus = 4110,

    InternalServerError = 5000,

    NotificationNotFound = 6004,
    TemplateInvalid = 6100,
    TemplateNotFound = 6104,

    LineSignatureInvalid = 7001,
    LineDisabled = 7002,
}
