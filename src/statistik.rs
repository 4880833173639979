// src/statistik.rs
//
// Agregasi statistik dasbor dan opsi filter program kerja. Semuanya fold
// murni di atas hasil penyusun hierarki dan daftar datar; penanganan
// kegagalan fetch ada di controller, bukan di sini.
use std::collections::BTreeMap;

use serde::Serialize;

use crate::jabatan::{klasifikasi_jabatan, PeranInti};
use crate::models::anggota::Anggota;
use crate::models::divisi::Divisi;
use crate::models::proker::{ProkerBidangDetail, ProkerDivisiDetail};
use crate::struktur::StrukturBidang;

#[derive(Debug, PartialEq, Serialize)]
pub struct StatistikDasbor {
    pub bidang: usize,
    pub divisi: usize,
    pub anggota: usize,
    pub pengurus_inti: usize,
    // dua layar admin menghitung proker terpisah; jangan pernah digabung
    pub proker_divisi: usize,
    pub proker_bidang: usize,
}

pub fn statistik_dasbor(
    struktur: &[StrukturBidang],
    anggota_list: &[Anggota],
    total_proker_divisi: usize,
    total_proker_bidang: usize,
) -> StatistikDasbor {
    StatistikDasbor {
        bidang: struktur.len(),
        divisi: struktur.iter().map(|s| s.divisi.len()).sum(),
        anggota: anggota_list.len(),
        pengurus_inti: anggota_list.iter().filter(|a| a.divisi_id.is_none()).count(),
        proker_divisi: total_proker_divisi,
        proker_bidang: total_proker_bidang,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JenisFilter {
    Semua,
    Pengurus,
    Divisi,
}

/// Satu opsi filter proker untuk dropdown di halaman publik. `id` None
/// untuk bucket "Semua", kunci peran untuk pengurus inti, id divisi untuk
/// divisi.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpsiFilter {
    pub id: Option<String>,
    pub nama: String,
    pub jenis: JenisFilter,
    pub jumlah: usize,
}

/// Apakah sebuah proker masuk bucket peran inti tertentu: tanpa divisi dan
/// jabatan penanggung jawabnya terklasifikasi ke peran itu.
pub fn cocok_peran(proker: &ProkerDivisiDetail, peran: PeranInti) -> bool {
    proker.proker.divisi_id.is_none()
        && proker
            .penanggung_jawab
            .as_ref()
            .map_or(false, |pj| klasifikasi_jabatan(&pj.jabatan) == Some(peran))
}

/// Bucket "Semua" selalu pertama dan memuat total tanpa filter; bucket
/// peran/divisi dengan nol proker tidak ikut dikembalikan.
pub fn opsi_filter_proker(
    proker_list: &[ProkerDivisiDetail],
    divisi_list: &[Divisi],
) -> Vec<OpsiFilter> {
    let mut opsi = vec![OpsiFilter {
        id: None,
        nama: "Semua Program Kerja".to_string(),
        jenis: JenisFilter::Semua,
        jumlah: proker_list.len(),
    }];

    for peran in PeranInti::SEMUA {
        let jumlah = proker_list.iter().filter(|p| cocok_peran(p, peran)).count();
        if jumlah > 0 {
            opsi.push(OpsiFilter {
                id: Some(peran.kunci().to_string()),
                nama: peran.label().to_string(),
                jenis: JenisFilter::Pengurus,
                jumlah,
            });
        }
    }

    for d in divisi_list {
        let jumlah = proker_list
            .iter()
            .filter(|p| p.proker.divisi_id.as_deref() == Some(d.id.as_str()))
            .count();
        if jumlah > 0 {
            opsi.push(OpsiFilter {
                id: Some(d.id.clone()),
                nama: d.nama.clone(),
                jenis: JenisFilter::Divisi,
                jumlah,
            });
        }
    }

    opsi
}

#[derive(Debug, PartialEq, Serialize)]
pub struct StatistikProkerDivisi {
    pub total: usize,
    // nama divisi -> jumlah; proker tanpa divisi dihitung sebagai "Pengurus Inti"
    pub per_divisi: BTreeMap<String, usize>,
    pub pengurus_inti: usize,
    pub per_status: BTreeMap<String, usize>,
}

pub fn statistik_proker_divisi(proker_list: &[ProkerDivisiDetail]) -> StatistikProkerDivisi {
    let mut per_divisi: BTreeMap<String, usize> = BTreeMap::new();
    let mut per_status: BTreeMap<String, usize> = BTreeMap::new();
    let mut pengurus_inti = 0usize;

    for p in proker_list {
        match p.divisi.as_ref() {
            Some(d) => *per_divisi.entry(d.divisi.nama.clone()).or_insert(0) += 1,
            None => {
                *per_divisi.entry("Pengurus Inti".to_string()).or_insert(0) += 1;
                pengurus_inti += 1;
            }
        }
        if let Some(status) = &p.proker.status {
            *per_status.entry(status.clone()).or_insert(0) += 1;
        }
    }

    StatistikProkerDivisi {
        total: proker_list.len(),
        per_divisi,
        pengurus_inti,
        per_status,
    }
}

#[derive(Debug, PartialEq, Serialize)]
pub struct StatistikProkerBidang {
    pub total: usize,
    pub per_bidang: BTreeMap<String, usize>,
}

pub fn statistik_proker_bidang(proker_list: &[ProkerBidangDetail]) -> StatistikProkerBidang {
    let mut per_bidang: BTreeMap<String, usize> = BTreeMap::new();
    for p in proker_list {
        let nama = p
            .bidang
            .as_ref()
            .map(|b| b.nama.clone())
            .unwrap_or_else(|| "Unknown".to_string());
        *per_bidang.entry(nama).or_insert(0) += 1;
    }
    StatistikProkerBidang {
        total: proker_list.len(),
        per_bidang,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::bidang::Bidang;
    use crate::models::proker::ProkerDivisi;
    use crate::struktur::susun_struktur;
    use chrono::Utc;

    fn bidang(id: &str) -> Bidang {
        Bidang {
            id: id.into(),
            nama: format!("Bidang {id}"),
            deskripsi: None,
            kepala_bidang_id: None,
            urutan: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn divisi(id: &str, bidang_id: &str) -> Divisi {
        Divisi {
            id: id.into(),
            bidang_id: bidang_id.into(),
            nama: format!("Divisi {id}"),
            deskripsi: None,
            urutan: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn anggota(id: &str, jabatan: &str, divisi_id: Option<&str>) -> Anggota {
        Anggota {
            id: id.into(),
            nama: format!("Anggota {id}"),
            jabatan: jabatan.into(),
            angkatan: 2023,
            divisi_id: divisi_id.map(Into::into),
            foto_url: None,
            email: None,
            telepon: None,
            bio: None,
            urutan: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn proker(
        id: &str,
        divisi_id: Option<&str>,
        pj: Option<Anggota>,
        status: Option<&str>,
    ) -> ProkerDivisiDetail {
        let divisi = divisi_id.map(|d| crate::models::divisi::DivisiDetail {
            divisi: self::divisi(d, "b1"),
            bidang: None,
        });
        ProkerDivisiDetail {
            proker: ProkerDivisi {
                id: id.into(),
                nama: format!("Proker {id}"),
                deskripsi: None,
                divisi_id: divisi_id.map(Into::into),
                penanggung_jawab_id: pj.as_ref().map(|a| a.id.clone()),
                foto_url: None,
                status: status.map(Into::into),
                tanggal_mulai: None,
                tanggal_selesai: None,
                urutan: 0,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            divisi,
            penanggung_jawab: pj,
        }
    }

    #[test]
    fn statistik_dasbor_konsisten_dengan_pohon() {
        let bidang_list = vec![bidang("b1"), bidang("b2")];
        let divisi_list = vec![divisi("d1", "b1"), divisi("d2", "b1"), divisi("d3", "b2")];
        let anggota_list = vec![
            anggota("a1", "Ketua Umum", None),
            anggota("a2", "Staff", Some("d1")),
            anggota("a3", "Staff", Some("d3")),
        ];

        let struktur = susun_struktur(
            bidang_list.clone(),
            divisi_list.clone(),
            anggota_list.clone(),
        );
        let stat = statistik_dasbor(&struktur, &anggota_list, 7, 2);

        assert_eq!(stat.bidang, 2);
        assert_eq!(
            stat.divisi,
            struktur.iter().map(|s| s.divisi.len()).sum::<usize>()
        );
        assert_eq!(stat.divisi, 3);
        // anggota = pengurus inti + jumlah anggota seluruh divisi
        let di_divisi: usize = struktur
            .iter()
            .flat_map(|s| &s.divisi)
            .map(|d| d.anggota.len())
            .sum();
        assert_eq!(stat.anggota, stat.pengurus_inti + di_divisi);
        assert_eq!(stat.proker_divisi, 7);
        assert_eq!(stat.proker_bidang, 2);
    }

    #[test]
    fn bucket_kosong_tidak_dikembalikan() {
        let ketua = anggota("a1", "Ketua Umum", None);
        let divisi_list = vec![divisi("d1", "b1"), divisi("d2", "b1")];
        let proker_list = vec![
            proker("p1", None, Some(ketua), None),
            proker("p2", Some("d1"), None, None),
            proker("p3", Some("d1"), None, None),
        ];

        let opsi = opsi_filter_proker(&proker_list, &divisi_list);

        // Semua + Ketua + Divisi d1; tidak ada bucket untuk wakil/sekretaris/
        // bendahara maupun d2 yang kosong
        assert_eq!(opsi.len(), 3);
        assert_eq!(opsi[0].jenis, JenisFilter::Semua);
        assert_eq!(opsi[0].jumlah, 3);
        assert_eq!(opsi[1].id.as_deref(), Some("ketua"));
        assert_eq!(opsi[1].jumlah, 1);
        assert_eq!(opsi[2].id.as_deref(), Some("d1"));
        assert_eq!(opsi[2].jumlah, 2);
    }

    #[test]
    fn bucket_semua_selalu_total_tanpa_filter() {
        let divisi_list = vec![divisi("d1", "b1")];
        let proker_list = vec![
            proker("p1", None, None, None), // tanpa PJ: tidak masuk bucket manapun
            proker("p2", Some("d1"), None, None),
        ];
        let opsi = opsi_filter_proker(&proker_list, &divisi_list);
        assert_eq!(opsi[0].jumlah, 2);
    }

    #[test]
    fn wakil_ketua_tidak_masuk_bucket_ketua() {
        let wakil = anggota("a1", "Wakil Ketua Umum", None);
        let proker_list = vec![proker("p1", None, Some(wakil), None)];
        let opsi = opsi_filter_proker(&proker_list, &[]);
        assert_eq!(opsi.len(), 2);
        assert_eq!(opsi[1].id.as_deref(), Some("wakil"));
    }

    #[test]
    fn statistik_proker_divisi_membagi_per_nama_dan_status() {
        let ketua = anggota("a1", "Ketua Umum", None);
        let proker_list = vec![
            proker("p1", Some("d1"), None, Some("ongoing")),
            proker("p2", Some("d1"), None, Some("completed")),
            proker("p3", None, Some(ketua), Some("ongoing")),
        ];
        let stat = statistik_proker_divisi(&proker_list);
        assert_eq!(stat.total, 3);
        assert_eq!(stat.pengurus_inti, 1);
        assert_eq!(stat.per_divisi.get("Divisi d1"), Some(&2));
        assert_eq!(stat.per_divisi.get("Pengurus Inti"), Some(&1));
        assert_eq!(stat.per_status.get("ongoing"), Some(&2));
        assert_eq!(stat.per_status.get("completed"), Some(&1));
    }
}
