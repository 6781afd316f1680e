use super::loader::parse_items;
use super::model::ListingTable;
use super::preprocess::preprocess;

/// Six listings over three categories and four days. The last one has a
/// basement floor ("B1", not numeric) and a zero size.
pub const SAMPLE_JSON: &str = r#"{"items": [
    {"title": "역삼 카페 A", "businessMiddleCodeName": "카페", "deposit": 1000, "monthlyRent": 80,
     "premium": 200, "maintenanceFee": 10, "size": 33, "floor": 1,
     "createdDateUtc": "2024-03-01T09:00:00Z", "nearSubwayStation": "역삼역 도보 5분"},
    {"title": "강남 카페 B", "businessMiddleCodeName": "카페", "deposit": 3000, "monthlyRent": 150,
     "premium": 1500, "maintenanceFee": 20, "size": 50, "floor": 2,
     "createdDateUtc": "2024-03-01T15:00:00Z", "nearSubwayStation": "강남역 도보 3분"},
    {"title": "신촌 식당", "businessMiddleCodeName": "음식점", "deposit": 2000, "monthlyRent": 120,
     "premium": 0, "maintenanceFee": 15, "size": 66, "floor": 1,
     "createdDateUtc": "2024-03-02T10:00:00Z", "nearSubwayStation": null},
    {"title": "홍대 식당", "businessMiddleCodeName": "음식점", "deposit": 5000, "monthlyRent": 250,
     "premium": 3000, "maintenanceFee": 30, "size": 100, "floor": 3,
     "createdDateUtc": "2024-03-03T11:00:00Z", "nearSubwayStation": "홍대입구역 도보 10분"},
    {"title": "잠실 편의점", "businessMiddleCodeName": "편의점", "deposit": 1500, "monthlyRent": 90,
     "premium": 500, "maintenanceFee": 12, "size": 40, "floor": 1,
     "createdDateUtc": "2024-03-03T12:00:00Z", "nearSubwayStation": "잠실역 도보 2분"},
    {"title": "건대 편의점", "businessMiddleCodeName": "편의점", "deposit": 0, "monthlyRent": 60,
     "premium": 0, "maintenanceFee": 8, "size": 0, "floor": "B1",
     "createdDateUtc": "2024-03-04T08:00:00Z", "nearSubwayStation": "버스 정류장 앞"}
]}"#;

pub fn sample_table() -> ListingTable {
    preprocess(parse_items(SAMPLE_JSON).expect("sample JSON parses"))
}
