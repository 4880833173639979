//utils.rs
use actix_multipart::Field;
use futures_util::TryStreamExt as _;
use sanitize_filename::sanitize;
use serde::{Deserialize, Deserializer};
use std::path::Path;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

// Batas unggah diberlakukan sebelum file menyentuh penyimpanan
pub const MAKS_FOTO_ANGGOTA: usize = 500 * 1024;
pub const MAKS_FOTO_PROKER: usize = 5 * 1024 * 1024;

pub const DIR_FOTO_ANGGOTA: &str = "./uploads/assets/anggota";
pub const DIR_FOTO_PROKER_DIVISI: &str = "./uploads/assets/proker-divisi";
pub const DIR_FOTO_PROKER_BIDANG: &str = "./uploads/assets/proker-bidang";

#[derive(Debug)]
pub enum GalatUnggah {
    /// Pelanggaran batas ukuran/format; jadi 400 di controller
    Validasi(String),
    /// Kegagalan IO/direktori; jadi 500 di controller
    Penyimpanan(String),
}

/// Ekstensi file dari pasangan type/subtype content-type. Hanya JPEG, PNG,
/// dan WebP yang diterima.
fn ekstensi_dari_mime(tipe: &str, subtipe: &str) -> Option<&'static str> {
    match (tipe, subtipe) {
        ("image", "jpeg") | ("image", "jpg") => Some("jpg"),
        ("image", "png") => Some("png"),
        ("image", "webp") => Some("webp"),
        _ => None,
    }
}

fn label_batas(batas: usize) -> String {
    if batas >= 1024 * 1024 {
        format!("{} MB", batas / (1024 * 1024))
    } else {
        format!("{} KB", batas / 1024)
    }
}

/// Simpan satu field multipart berisi foto ke `dir`, menolak format di luar
/// JPG/PNG/WebP dan aliran yang melewati `batas` byte (file setengah jadi
/// ikut dihapus). Mengembalikan path relatif untuk disimpan di database.
pub async fn simpan_foto(
    mut field: Field,
    dir: &str,
    awalan: &str,
    batas: usize,
) -> Result<String, GalatUnggah> {
    let ext = field
        .content_type()
        .and_then(|ct| ekstensi_dari_mime(ct.type_().as_str(), ct.subtype().as_str()))
        .ok_or_else(|| GalatUnggah::Validasi("Format file harus JPG, PNG, atau WebP".into()))?;

    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| GalatUnggah::Penyimpanan(format!("Gagal membuat direktori: {e}")))?;

    let filename = sanitize(format!("{}-{}.{}", awalan, Uuid::new_v4().simple(), ext));
    let filepath = Path::new(dir).join(&filename);

    let mut f = tokio::fs::File::create(&filepath)
        .await
        .map_err(|e| GalatUnggah::Penyimpanan(format!("Gagal membuat file: {e}")))?;

    let mut total = 0usize;
    while let Some(chunk) = field
        .try_next()
        .await
        .map_err(|e| GalatUnggah::Penyimpanan(format!("Gagal membaca unggahan: {e}")))?
    {
        total += chunk.len();
        if total > batas {
            drop(f);
            let _ = tokio::fs::remove_file(&filepath).await;
            return Err(GalatUnggah::Validasi(format!(
                "Ukuran file maksimal {}",
                label_batas(batas)
            )));
        }
        f.write_all(&chunk)
            .await
            .map_err(|e| GalatUnggah::Penyimpanan(format!("Gagal menulis file: {e}")))?;
    }

    Ok(format!("{}/{}", dir.trim_start_matches("./"), filename))
}

fn path_unggahan_aman(rel: &str) -> bool {
    // hindari traversal: hanya path di bawah uploads/ yang boleh dihapus
    rel.starts_with("uploads/") && !rel.contains("..")
}

/// Hapus file unggahan lama; kegagalan diabaikan (file yatim diterima,
/// lihat kebijakan penggantian foto).
pub async fn hapus_file_jika_ada(rel: &str) {
    if !path_unggahan_aman(rel) {
        return;
    }
    let p = Path::new("./").join(rel);
    if p.exists() {
        let _ = tokio::fs::remove_file(&p).await;
    }
}

/// Deserializer tri-state untuk payload update parsial: field absen =>
/// `None`, `null` => `Some(None)`, nilai => `Some(Some(v))`. Dipakai dengan
/// `#[serde(default, deserialize_with = "opsi_ganda")]`.
pub fn opsi_ganda<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ekstensi_hanya_format_yang_diizinkan() {
        assert_eq!(ekstensi_dari_mime("image", "jpeg"), Some("jpg"));
        assert_eq!(ekstensi_dari_mime("image", "jpg"), Some("jpg"));
        assert_eq!(ekstensi_dari_mime("image", "png"), Some("png"));
        assert_eq!(ekstensi_dari_mime("image", "webp"), Some("webp"));
        assert_eq!(ekstensi_dari_mime("image", "gif"), None);
        assert_eq!(ekstensi_dari_mime("application", "pdf"), None);
    }

    #[test]
    fn label_batas_terbaca() {
        assert_eq!(label_batas(MAKS_FOTO_ANGGOTA), "500 KB");
        assert_eq!(label_batas(MAKS_FOTO_PROKER), "5 MB");
    }

    #[test]
    fn path_unggahan_di_luar_uploads_ditolak() {
        assert!(path_unggahan_aman("uploads/assets/anggota/a.jpg"));
        assert!(!path_unggahan_aman("/etc/passwd"));
        assert!(!path_unggahan_aman("uploads/../main.rs"));
        assert!(!path_unggahan_aman("https://example.com/a.jpg"));
    }

    #[derive(Debug, Deserialize)]
    struct MuatanUji {
        #[serde(default, deserialize_with = "opsi_ganda")]
        deskripsi: Option<Option<String>>,
    }

    #[test]
    fn opsi_ganda_membedakan_absen_null_dan_nilai() {
        let absen: MuatanUji = serde_json::from_str("{}").unwrap();
        assert_eq!(absen.deskripsi, None);

        let nol: MuatanUji = serde_json::from_str(r#"{"deskripsi": null}"#).unwrap();
        assert_eq!(nol.deskripsi, Some(None));

        let isi: MuatanUji = serde_json::from_str(r#"{"deskripsi": "halo"}"#).unwrap();
        assert_eq!(isi.deskripsi, Some(Some("halo".to_string())));
    }
}
