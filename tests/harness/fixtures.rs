use chrono::{DateTime, Duration, TimeZone, Utc};

use mongoconnect::domain::connection::{
    AuthMethod, ConnectionDescriptor, ConnectionId, ReadPreference, SslMethod,
};

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

pub fn minutes_after_base(minutes: i64) -> DateTime<Utc> {
    base_time() + Duration::minutes(minutes)
}

pub fn recent(id: &str, minutes: i64) -> ConnectionDescriptor {
    ConnectionDescriptor {
        id: ConnectionId::from(id),
        hostname: format!("{}.internal", id),
        last_used: Some(minutes_after_base(minutes)),
        ..ConnectionDescriptor::new()
    }
}

pub fn favorite(id: &str, name: &str) -> ConnectionDescriptor {
    ConnectionDescriptor {
        id: ConnectionId::from(id),
        name: name.to_string(),
        is_favorite: true,
        ..ConnectionDescriptor::new()
    }
}

pub fn atlas_with_credentials(id: &str) -> ConnectionDescriptor {
    let mut d = ConnectionDescriptor {
        id: ConnectionId::from(id),
        name: "Atlas".to_string(),
        hostname: "cluster0.ab12c.mongodb.net".to_string(),
        is_srv_record: true,
        read_preference: ReadPreference::SecondaryPreferred,
        replica_set_name: Some("atlas-rs".to_string()),
        is_favorite: true,
        ..ConnectionDescriptor::new()
    };
    d.auth.method = AuthMethod::Mongodb;
    d.auth.username = "reporter".to_string();
    d.auth.password = "p@ss/word".to_string();
    d.tls.method = SslMethod::SystemCa;
    d
}
