//! Central column preset module
//!
//! Every fixed-schema output column list lives here. When Finstat adds a field
//! to a response, append the element name to the matching preset below; the
//! normalizer and the table manifest both read from `preset_for()`.

use crate::RequestType;

/// Primary key of every output table
pub const ICO_COLUMN: &str = "Ico";

/// Run timestamp column appended to fixed-schema rows
pub const TIMESTAMP_COLUMN: &str = "timestamp";

/// Run timestamp column appended to flattened rows
pub const UPDATE_DATE_COLUMN: &str = "update_date";

pub const DETAIL_COLUMNS: &[&str] = &[
    "Ico", "RegisterNumberText", "Dic", "IcDPH", "Name", "Street", "StreetNumber", "ZipCode",
    "City", "District", "Region", "Country", "Activity", "Created", "Cancelled",
    "SuspendedAsPerson", "Url", "Warning", "WarningUrl", "PaymentOrderWarning",
    "PaymentOrderUrl", "OrChange", "OrChangeUrl", "Revenue", "SkNaceCode", "SkNaceText",
    "SkNaceDivision", "SkNaceGroup", "LegalFormCode", "LegalFormText", "RpvsInsert", "RpvsUrl",
    "ProfitActual", "RevenueActual", "JudgementFinstatLink", "SalesCategory", "HasKaR",
    "KarUrl", "HasDebt", "DebtUrl", "JudgementIndicators",
];

pub const EXTENDED_COLUMNS: &[&str] = &[
    "Ico", "Dic", "IcDPH", "Name", "Street", "StreetNumber", "ZipCode", "City", "Activity",
    "District", "Region", "Country", "Created", "Cancelled", "SuspendedAsPerson", "Url",
    "RegisterNumberText", "IcDphAdditional", "SkNaceCode", "SkNaceText", "SkNaceDivision",
    "SkNaceGroup", "Phones", "Emails", "Warning", "WarningUrl", "Debts", "StateReceivables",
    "CommercialReceivables", "PaymentOrderWarning", "PaymentOrderUrl", "PaymentOrders",
    "OrChange", "OrChangeUrl", "EmployeeCode", "EmployeeText", "LegalFormCode", "LegalFormText",
    "RpvsInsert", "RpvsUrl", "OwnershipTypeCode", "OwnershipTypeText", "CreditScoreValue",
    "ProfitActual", "ProfitPrev", "RevenueActual", "RevenuePrev", "ActualYear",
    "CreditScoreState", "ForeignResources", "GrossMargin", "ROA", "WarningLiquidation",
    "SelfEmployed", "WarningKaR", "Offices", "Subjects", "StructuredName", "HasKaR", "KarUrl",
    "HasDebt", "DebtUrl", "HasDisposal", "DisposalUrl", "ContactSources", "BasicCapital",
    "JudgementIndicators", "JudgementFinstatLink", "JudgementCounts",
    "JudgementLastPublishedDate", "Ratios", "SalesCategory",
];

/// Returns the fixed column preset for a request type (without the timestamp column).
///
/// `ultimate` responses carry every `extended` field, so they share that preset.
pub fn preset_for(request_type: RequestType) -> &'static [&'static str] {
    match request_type {
        RequestType::Detail => DETAIL_COLUMNS,
        RequestType::Extended | RequestType::Ultimate => EXTENDED_COLUMNS,
    }
}
