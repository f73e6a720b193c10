//! Attribute tag constants for the attributes in the built-in dictionary.
//!
//! Each constant is named after the attribute keyword in upper snake case.

use dcmtree_core::Tag;

/** (0002,0000) File Meta Information Group Length */
pub const FILE_META_INFORMATION_GROUP_LENGTH: Tag = Tag(0x0002, 0x0000);
/** (0002,0001) File Meta Information Version */
pub const FILE_META_INFORMATION_VERSION: Tag = Tag(0x0002, 0x0001);
/** (0002,0002) Media Storage SOP Class UID */
pub const MEDIA_STORAGE_SOP_CLASS_UID: Tag = Tag(0x0002, 0x0002);
/** (0002,0003) Media Storage SOP Instance UID */
pub const MEDIA_STORAGE_SOP_INSTANCE_UID: Tag = Tag(0x0002, 0x0003);
/** (0002,0010) Transfer Syntax UID */
pub const TRANSFER_SYNTAX_UID: Tag = Tag(0x0002, 0x0010);
/** (0002,0012) Implementation Class UID */
pub const IMPLEMENTATION_CLASS_UID: Tag = Tag(0x0002, 0x0012);
/** (0002,0013) Implementation Version Name */
pub const IMPLEMENTATION_VERSION_NAME: Tag = Tag(0x0002, 0x0013);
/** (0002,0016) Source Application Entity Title */
pub const SOURCE_APPLICATION_ENTITY_TITLE: Tag = Tag(0x0002, 0x0016);
/** (0002,0100) Private Information Creator UID */
pub const PRIVATE_INFORMATION_CREATOR_UID: Tag = Tag(0x0002, 0x0100);
/** (0002,0102) Private Information */
pub const PRIVATE_INFORMATION: Tag = Tag(0x0002, 0x0102);
/** (0008,0005) Specific Character Set */
pub const SPECIFIC_CHARACTER_SET: Tag = Tag(0x0008, 0x0005);
/** (0008,0008) Image Type */
pub const IMAGE_TYPE: Tag = Tag(0x0008, 0x0008);
/** (0008,0012) Instance Creation Date */
pub const INSTANCE_CREATION_DATE: Tag = Tag(0x0008, 0x0012);
/** (0008,0013) Instance Creation Time */
pub const INSTANCE_CREATION_TIME: Tag = Tag(0x0008, 0x0013);
/** (0008,0016) SOP Class UID */
pub const SOP_CLASS_UID: Tag = Tag(0x0008, 0x0016);
/** (0008,0018) SOP Instance UID */
pub const SOP_INSTANCE_UID: Tag = Tag(0x0008, 0x0018);
/** (0008,0020) Study Date */
pub const STUDY_DATE: Tag = Tag(0x0008, 0x0020);
/** (0008,0021) Series Date */
pub const SERIES_DATE: Tag = Tag(0x0008, 0x0021);
/** (0008,0022) Acquisition Date */
pub const ACQUISITION_DATE: Tag = Tag(0x0008, 0x0022);
/** (0008,0023) Content Date */
pub const CONTENT_DATE: Tag = Tag(0x0008, 0x0023);
/** (0008,002A) Acquisition DateTime */
pub const ACQUISITION_DATE_TIME: Tag = Tag(0x0008, 0x002A);
/** (0008,0030) Study Time */
pub const STUDY_TIME: Tag = Tag(0x0008, 0x0030);
/** (0008,0031) Series Time */
pub const SERIES_TIME: Tag = Tag(0x0008, 0x0031);
/** (0008,0033) Content Time */
pub const CONTENT_TIME: Tag = Tag(0x0008, 0x0033);
/** (0008,0040) Data Set Type */
pub const DATA_SET_TYPE: Tag = Tag(0x0008, 0x0040);
/** (0008,0050) Accession Number */
pub const ACCESSION_NUMBER: Tag = Tag(0x0008, 0x0050);
/** (0008,0060) Modality */
pub const MODALITY: Tag = Tag(0x0008, 0x0060);
/** (0008,0064) Conversion Type */
pub const CONVERSION_TYPE: Tag = Tag(0x0008, 0x0064);
/** (0008,0070) Manufacturer */
pub const MANUFACTURER: Tag = Tag(0x0008, 0x0070);
/** (0008,0080) Institution Name */
pub const INSTITUTION_NAME: Tag = Tag(0x0008, 0x0080);
/** (0008,0090) Referring Physician's Name */
pub const REFERRING_PHYSICIAN_NAME: Tag = Tag(0x0008, 0x0090);
/** (0008,0100) Code Value */
pub const CODE_VALUE: Tag = Tag(0x0008, 0x0100);
/** (0008,0102) Coding Scheme Designator */
pub const CODING_SCHEME_DESIGNATOR: Tag = Tag(0x0008, 0x0102);
/** (0008,0104) Code Meaning */
pub const CODE_MEANING: Tag = Tag(0x0008, 0x0104);
/** (0008,1030) Study Description */
pub const STUDY_DESCRIPTION: Tag = Tag(0x0008, 0x1030);
/** (0008,103E) Series Description */
pub const SERIES_DESCRIPTION: Tag = Tag(0x0008, 0x103E);
/** (0008,1090) Manufacturer's Model Name */
pub const MANUFACTURER_MODEL_NAME: Tag = Tag(0x0008, 0x1090);
/** (0008,1115) Referenced Series Sequence */
pub const REFERENCED_SERIES_SEQUENCE: Tag = Tag(0x0008, 0x1115);
/** (0008,1140) Referenced Image Sequence */
pub const REFERENCED_IMAGE_SEQUENCE: Tag = Tag(0x0008, 0x1140);
/** (0008,1150) Referenced SOP Class UID */
pub const REFERENCED_SOP_CLASS_UID: Tag = Tag(0x0008, 0x1150);
/** (0008,1155) Referenced SOP Instance UID */
pub const REFERENCED_SOP_INSTANCE_UID: Tag = Tag(0x0008, 0x1155);
/** (0008,2112) Source Image Sequence */
pub const SOURCE_IMAGE_SEQUENCE: Tag = Tag(0x0008, 0x2112);
/** (0010,0010) Patient's Name */
pub const PATIENT_NAME: Tag = Tag(0x0010, 0x0010);
/** (0010,0020) Patient ID */
pub const PATIENT_ID: Tag = Tag(0x0010, 0x0020);
/** (0010,0030) Patient's Birth Date */
pub const PATIENT_BIRTH_DATE: Tag = Tag(0x0010, 0x0030);
/** (0010,0040) Patient's Sex */
pub const PATIENT_SEX: Tag = Tag(0x0010, 0x0040);
/** (0010,1010) Patient's Age */
pub const PATIENT_AGE: Tag = Tag(0x0010, 0x1010);
/** (0010,1020) Patient's Size */
pub const PATIENT_SIZE: Tag = Tag(0x0010, 0x1020);
/** (0010,1030) Patient's Weight */
pub const PATIENT_WEIGHT: Tag = Tag(0x0010, 0x1030);
/** (0010,4000) Patient Comments */
pub const PATIENT_COMMENTS: Tag = Tag(0x0010, 0x4000);
/** (0018,0015) Body Part Examined */
pub const BODY_PART_EXAMINED: Tag = Tag(0x0018, 0x0015);
/** (0018,0050) Slice Thickness */
pub const SLICE_THICKNESS: Tag = Tag(0x0018, 0x0050);
/** (0018,0060) KVP */
pub const KVP: Tag = Tag(0x0018, 0x0060);
/** (0018,1020) Software Versions */
pub const SOFTWARE_VERSIONS: Tag = Tag(0x0018, 0x1020);
/** (0018,5100) Patient Position */
pub const PATIENT_POSITION: Tag = Tag(0x0018, 0x5100);
/** (0020,000D) Study Instance UID */
pub const STUDY_INSTANCE_UID: Tag = Tag(0x0020, 0x000D);
/** (0020,000E) Series Instance UID */
pub const SERIES_INSTANCE_UID: Tag = Tag(0x0020, 0x000E);
/** (0020,0010) Study ID */
pub const STUDY_ID: Tag = Tag(0x0020, 0x0010);
/** (0020,0011) Series Number */
pub const SERIES_NUMBER: Tag = Tag(0x0020, 0x0011);
/** (0020,0013) Instance Number */
pub const INSTANCE_NUMBER: Tag = Tag(0x0020, 0x0013);
/** (0020,0020) Patient Orientation */
pub const PATIENT_ORIENTATION: Tag = Tag(0x0020, 0x0020);
/** (0020,0032) Image Position (Patient) */
pub const IMAGE_POSITION_PATIENT: Tag = Tag(0x0020, 0x0032);
/** (0020,0037) Image Orientation (Patient) */
pub const IMAGE_ORIENTATION_PATIENT: Tag = Tag(0x0020, 0x0037);
/** (0020,0052) Frame of Reference UID */
pub const FRAME_OF_REFERENCE_UID: Tag = Tag(0x0020, 0x0052);
/** (0020,1041) Slice Location */
pub const SLICE_LOCATION: Tag = Tag(0x0020, 0x1041);
/** (0020,4000) Image Comments */
pub const IMAGE_COMMENTS: Tag = Tag(0x0020, 0x4000);
/** (0028,0002) Samples per Pixel */
pub const SAMPLES_PER_PIXEL: Tag = Tag(0x0028, 0x0002);
/** (0028,0004) Photometric Interpretation */
pub const PHOTOMETRIC_INTERPRETATION: Tag = Tag(0x0028, 0x0004);
/** (0028,0005) Image Dimensions */
pub const IMAGE_DIMENSIONS: Tag = Tag(0x0028, 0x0005);
/** (0028,0008) Number of Frames */
pub const NUMBER_OF_FRAMES: Tag = Tag(0x0028, 0x0008);
/** (0028,0009) Frame Increment Pointer */
pub const FRAME_INCREMENT_POINTER: Tag = Tag(0x0028, 0x0009);
/** (0028,0010) Rows */
pub const ROWS: Tag = Tag(0x0028, 0x0010);
/** (0028,0011) Columns */
pub const COLUMNS: Tag = Tag(0x0028, 0x0011);
/** (0028,0030) Pixel Spacing */
pub const PIXEL_SPACING: Tag = Tag(0x0028, 0x0030);
/** (0028,0100) Bits Allocated */
pub const BITS_ALLOCATED: Tag = Tag(0x0028, 0x0100);
/** (0028,0101) Bits Stored */
pub const BITS_STORED: Tag = Tag(0x0028, 0x0101);
/** (0028,0102) High Bit */
pub const HIGH_BIT: Tag = Tag(0x0028, 0x0102);
/** (0028,0103) Pixel Representation */
pub const PIXEL_REPRESENTATION: Tag = Tag(0x0028, 0x0103);
/** (0028,0106) Smallest Image Pixel Value */
pub const SMALLEST_IMAGE_PIXEL_VALUE: Tag = Tag(0x0028, 0x0106);
/** (0028,0107) Largest Image Pixel Value */
pub const LARGEST_IMAGE_PIXEL_VALUE: Tag = Tag(0x0028, 0x0107);
/** (0028,1050) Window Center */
pub const WINDOW_CENTER: Tag = Tag(0x0028, 0x1050);
/** (0028,1051) Window Width */
pub const WINDOW_WIDTH: Tag = Tag(0x0028, 0x1051);
/** (0028,1052) Rescale Intercept */
pub const RESCALE_INTERCEPT: Tag = Tag(0x0028, 0x1052);
/** (0028,1053) Rescale Slope */
pub const RESCALE_SLOPE: Tag = Tag(0x0028, 0x1053);
/** (0028,1054) Rescale Type */
pub const RESCALE_TYPE: Tag = Tag(0x0028, 0x1054);
/** (0040,0260) Performed Protocol Code Sequence */
pub const PERFORMED_PROTOCOL_CODE_SEQUENCE: Tag = Tag(0x0040, 0x0260);
/** (0040,A730) Content Sequence */
pub const CONTENT_SEQUENCE: Tag = Tag(0x0040, 0xA730);
/** (0040,A040) Value Type */
pub const VALUE_TYPE: Tag = Tag(0x0040, 0xA040);
/** (0040,A160) Text Value */
pub const TEXT_VALUE: Tag = Tag(0x0040, 0xA160);
/** (0040,A30A) Numeric Value */
pub const NUMERIC_VALUE: Tag = Tag(0x0040, 0xA30A);
/** (7FE0,0010) Pixel Data */
pub const PIXEL_DATA: Tag = Tag(0x7FE0, 0x0010);
/** (FFFE,E000) Item */
pub const ITEM: Tag = Tag(0xFFFE, 0xE000);
/** (FFFE,E00D) Item Delimitation Item */
pub const ITEM_DELIMITATION_ITEM: Tag = Tag(0xFFFE, 0xE00D);
/** (FFFE,E0DD) Sequence Delimitation Item */
pub const SEQUENCE_DELIMITATION_ITEM: Tag = Tag(0xFFFE, 0xE0DD);
